//! Analyze command implementation.
//!
//! Builds one job per input, runs the jobs on the rayon pool and emits the
//! reports in input order.

use ahash::AHashSet;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use smaps_analyzer::scanner::find_processes;
use smaps_analyzer::{analyze, ReportOptions, SmapsSource};

use crate::cli::Args;
use crate::config::Config;

/// One parse-and-report unit.
#[derive(Debug, Clone)]
struct Job {
    source: SmapsSource,
    label: String,
    file_name: String,
}

impl Job {
    fn from_source(source: SmapsSource) -> Self {
        let label = source.label();
        let file_name = match &source {
            SmapsSource::File(p) => format!(
                "{}.analyzed",
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "smaps".to_string())
            ),
            SmapsSource::Stdin => "stdin.analyzed".to_string(),
            SmapsSource::Pid { pid, .. } => format!("{}.smap.analyzed", pid),
        };
        Self {
            source,
            label,
            file_name,
        }
    }
}

/// Collects jobs from --file, --pid or --process-string.
fn collect_jobs(args: &Args, config: &Config) -> Vec<Job> {
    let mut jobs: Vec<Job> = if let Some(pattern) = &args.process_string {
        find_processes(Path::new("/proc"), pattern, config.max_processes)
            .into_iter()
            .map(|entry| Job {
                source: entry.source(),
                label: entry.label(),
                file_name: entry.report_file_name(),
            })
            .collect()
    } else {
        let files = args
            .files
            .iter()
            .map(PathBuf::as_path)
            .map(SmapsSource::from_file_arg);
        let pids = args.pid.iter().map(|&pid| SmapsSource::pid(pid));
        files.chain(pids).map(Job::from_source).collect()
    };
    dedupe_file_names(&mut jobs);
    jobs
}

/// Gives every job its own report file: later duplicates of a name get a
/// numeric suffix (`smaps.analyzed`, `smaps-2.analyzed`, ...).
fn dedupe_file_names(jobs: &mut [Job]) {
    let mut taken: AHashSet<String> = jobs.iter().map(|j| j.file_name.clone()).collect();
    let mut seen: AHashSet<String> = AHashSet::with_capacity(jobs.len());

    for job in jobs.iter_mut() {
        if seen.insert(job.file_name.clone()) {
            continue;
        }
        let stem = job
            .file_name
            .strip_suffix(".analyzed")
            .unwrap_or(&job.file_name)
            .to_string();
        let unique = (2..)
            .map(|n| format!("{}-{}.analyzed", stem, n))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_else(|| job.file_name.clone());
        debug!(
            "Report file {} already taken, writing {} to {}",
            job.file_name, job.label, unique
        );
        taken.insert(unique.clone());
        seen.insert(unique.clone());
        job.file_name = unique;
    }
}

/// Header label: the configured name wins; several inputs fall back to
/// their own labels so reports stay distinguishable.
fn job_options(base: &ReportOptions, job: &Job, multiple: bool) -> ReportOptions {
    let mut opts = base.clone();
    if opts.process_name.is_empty() && multiple {
        opts.process_name = job.label.clone();
    }
    opts
}

fn write_report(dir: &Path, job: &Job, report: &str) -> Result<PathBuf, std::io::Error> {
    let path = dir.join(&job.file_name);
    fs::write(&path, report)?;
    Ok(path)
}

/// Runs the analysis. Returns `Ok(false)` if any input failed.
pub fn command_analyze(
    args: &Args,
    config: &Config,
    opts: &ReportOptions,
) -> Result<bool, Box<dyn std::error::Error>> {
    if let Some(threads) = config.parallelism {
        if threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .unwrap_or_else(|e| error!("Failed to set rayon thread pool: {}", e));
            debug!("Rayon thread pool configured with {} threads", threads);
        }
    }

    let jobs = collect_jobs(args, config);
    if jobs.is_empty() {
        warn!("No matching processes found");
        eprintln!("No matching processes found");
        return Ok(true);
    }

    let output_dir = config.output_dir.as_deref();
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)?;
    }

    let multiple = jobs.len() > 1 || args.process_string.is_some();
    let start = Instant::now();

    let results: Vec<_> = jobs
        .par_iter()
        .map(|job| analyze(&job.source, &job_options(opts, job, multiple)))
        .collect();

    debug!(
        "Analyzed {} inputs in {:.2}ms",
        jobs.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let mut failures = 0usize;
    let mut printed = 0usize;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(report) => match output_dir {
                Some(dir) => match write_report(dir, job, &report) {
                    Ok(path) => {
                        info!("Analyzed smaps of {} into {}", job.label, path.display());
                        println!("Analyzing smaps {}", path.display());
                    }
                    Err(e) => {
                        error!("Failed to write report for {}: {}", job.label, e);
                        eprintln!("❌ {}: {}", job.file_name, e);
                        failures += 1;
                    }
                },
                None => {
                    if printed > 0 {
                        println!();
                    }
                    print!("{}", report);
                    printed += 1;
                }
            },
            Err(e) => {
                error!("Failed to analyze {}: {}", job.source, e);
                eprintln!("❌ {}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        warn!("{} of {} inputs failed", failures, jobs.len());
    }
    Ok(failures == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve_config, validate_effective_config};
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_collect_jobs_files_then_pids() {
        let args =
            Args::try_parse_from(["smaps-analyzer", "-f", "/tmp/a.smap", "-f", "-"]).unwrap();
        let jobs = collect_jobs(&args, &Config::default());
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].source, SmapsSource::File(PathBuf::from("/tmp/a.smap")));
        assert_eq!(jobs[0].file_name, "a.smap.analyzed");
        assert_eq!(jobs[1].source, SmapsSource::Stdin);

        let args = Args::try_parse_from(["smaps-analyzer", "-p", "7"]).unwrap();
        let jobs = collect_jobs(&args, &Config::default());
        assert_eq!(jobs[0].label, "pid 7");
        assert_eq!(jobs[0].file_name, "7.smap.analyzed");
    }

    #[test]
    fn test_job_options_label_fallback() {
        let job = Job::from_source(SmapsSource::pid(7));
        let base = ReportOptions::default();
        assert_eq!(job_options(&base, &job, false).process_name, "");
        assert_eq!(job_options(&base, &job, true).process_name, "pid 7");

        let named = ReportOptions {
            process_name: "app".to_string(),
            ..ReportOptions::default()
        };
        assert_eq!(job_options(&named, &job, true).process_name, "app");
    }

    #[test]
    fn test_duplicate_file_names_get_suffix() {
        let args = Args::try_parse_from([
            "smaps-analyzer",
            "-f",
            "/tmp/a/smaps",
            "-f",
            "/tmp/b/smaps",
            "-f",
            "/tmp/smaps-2",
            "-f",
            "/tmp/c/smaps",
        ])
        .unwrap();
        let jobs = collect_jobs(&args, &Config::default());
        let names: Vec<&str> = jobs.iter().map(|j| j.file_name.as_str()).collect();
        assert_eq!(
            names,
            [
                "smaps.analyzed",
                "smaps-3.analyzed",
                "smaps-2.analyzed",
                "smaps-4.analyzed"
            ]
        );
    }

    #[test]
    fn test_output_dir_keeps_every_report() {
        let tmp = TempDir::new().unwrap();
        for (dir, object) in [("a", "/bin/a"), ("b", "/bin/b")] {
            let input = tmp.path().join(dir);
            fs::create_dir_all(&input).unwrap();
            fs::write(
                input.join("smaps"),
                format!("00400000-00452000 r-xp 00000000 08:02 173521      {}\nPss: 8 kB\n", object),
            )
            .unwrap();
        }
        let out = tmp.path().join("out");

        let paths: Vec<String> = ["a", "b"]
            .iter()
            .map(|d| tmp.path().join(d).join("smaps").display().to_string())
            .collect();
        let out_arg = out.display().to_string();
        let args = Args::try_parse_from([
            "smaps-analyzer",
            "--no-config",
            "-f",
            &paths[0],
            "-f",
            &paths[1],
            "-o",
            &out_arg,
        ])
        .unwrap();
        let config = resolve_config(&args).unwrap();
        let opts = validate_effective_config(&config).unwrap();

        assert!(command_analyze(&args, &config, &opts).unwrap());

        let first = fs::read_to_string(out.join("smaps.analyzed")).unwrap();
        let second = fs::read_to_string(out.join("smaps-2.analyzed")).unwrap();
        assert!(first.contains("/bin/a"));
        assert!(second.contains("/bin/b"));
        assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
    }
}
