//! Plain-text layout of a [`Report`].

use std::fmt;

use super::{Listing, Report};

const RULE: &str =
    "===============================================================================";

fn write_table(f: &mut fmt::Formatter<'_>, listing: &Listing<'_>) -> fmt::Result {
    writeln!(
        f,
        "{:<11}{:<11}{:<11}{:<11}{:<11}",
        "PSS", "RSS", "Size", "Anon", "Name"
    )?;
    for row in &listing.rows {
        writeln!(
            f,
            "{:<11}{:<11}{:<11}{:<11}{:<11}",
            format!("{} kB", row.pss),
            format!("{} kB", row.rss),
            format!("{} kB", row.size),
            format!("{} kB", row.anonymous),
            row.name
        )?;
    }
    Ok(())
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.objects.title, self.process_name)?;
        writeln!(f, "{RULE}")?;
        write_table(f, &self.objects)?;

        for listing in &self.categories {
            writeln!(f, "\n{}:", listing.title)?;
            writeln!(f, "{RULE}")?;
            write_table(f, listing)?;
        }

        writeln!(f)?;
        writeln!(f, "Summary: {}", self.process_name)?;
        writeln!(f, "{RULE}")?;
        for (label, value) in self.summary.lines() {
            writeln!(f, "{:<20} = {:>8} kB", label, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::report::{build_report, ReportOptions};
    use crate::smaps::parse_smaps;

    #[test]
    fn test_text_layout() {
        let input = "\
0000000000-0000000010 rw-p 00000000 00:00 0   [stack]
Pss: 100 kB
Size: 200 kB
";
        let table = parse_smaps(input);
        let opts = ReportOptions {
            process_name: "demo".to_string(),
            ..ReportOptions::default()
        };
        let text = build_report(&table, &opts).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Per object data: demo");
        assert_eq!(lines[1].len(), 79);
        assert_eq!(lines[2], "PSS        RSS        Size       Anon       Name       ");
        assert_eq!(lines[3], "100 kB     0 kB       200 kB     0 kB       [stack]    ");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Summary: demo");
        assert_eq!(lines[7], "PSS                  =      100 kB");
        assert_eq!(lines[9], "Size (VSS)           =      200 kB");
        assert!(text.contains("Stacks PSS           =      100 kB\n"));
        assert!(!text.contains("All SO map"));
    }

    #[test]
    fn test_text_category_sections() {
        let input = "\
00400000-00401000 r-xp 00000000 08:02 1   /system/lib64/libc.so
Pss: 4 kB
Size: 8 kB
";
        let table = parse_smaps(input);
        let opts = ReportOptions {
            shared_object: true,
            ..ReportOptions::default()
        };
        let text = build_report(&table, &opts).to_string();

        assert!(text.contains("\nAll SO maps:\n===="));
        assert!(text.contains("All SO map PSS       =        4 kB\n"));
        assert!(text.contains("All SO map VSS       =        8 kB\n"));
        assert!(!text.contains("Stack maps:"));
    }
}
