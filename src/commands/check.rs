//! Check command implementation.
//!
//! Validates configuration and smaps accessibility.

use std::path::Path;

use smaps_analyzer::scanner::collect_proc_entries;
use smaps_analyzer::{category_total, parse_smaps, MemoryField, RegionFilter, SmapsSource};

use crate::config::{validate_effective_config, Config};

/// Validates configuration and that smaps can be read and parsed.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 smaps-analyzer - System Check");
    println!("================================");

    let mut all_ok = true;

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(opts) => {
            println!(
                "   ✅ Configuration is valid (sort by {})",
                opts.sort_field.as_str()
            );
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📁 Checking /proc filesystem...");
    if Path::new("/proc").exists() {
        let proc_entries = collect_proc_entries(Path::new("/proc"), Some(5));
        if proc_entries.is_empty() {
            println!("   ❌ Cannot read any process entries from /proc");
            all_ok = false;
        } else {
            println!("   ✅ Can read {} process entries", proc_entries.len());
        }
    } else {
        println!("   ❌ /proc filesystem not found");
        all_ok = false;
    }

    println!("\n💾 Checking smaps parsing...");
    let source = SmapsSource::pid(std::process::id());
    match source.read_to_string() {
        Ok(content) => {
            let table = parse_smaps(&content);
            let pss = category_total(&table, MemoryField::Pss, RegionFilter::All);
            if table.is_empty() {
                println!("   ❌ {} contains no regions", source);
                all_ok = false;
            } else {
                println!(
                    "   ✅ Parsed {}: {} regions, PSS={} kB",
                    source,
                    table.len(),
                    pss
                );
            }
        }
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}
