use crate::cli::{Cli, Commands, OutputFormat};
use crate::graph::{Graph, ScanReport, Scanner};
use crate::utils::config::{self, Config};
use crate::utils::table::{self, Align};
use clap::CommandFactory;
use clap_complete::generate;
use std::io;
use std::path::Path;

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn resolve_format(flag: Option<OutputFormat>, cfg: Option<&Config>) -> OutputFormat {
    if let Some(f) = flag {
        return f;
    }
    match cfg.and_then(|c| c.output.as_ref()).and_then(|o| o.format.as_deref()) {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    }
}

fn render_text(root: &Path, report: &ScanReport) -> String {
    let graph = &report.graph;
    let mut out = format!(
        "Scanned {} files, {} links ({} skipped) under {}\n",
        graph.nodes.len(),
        graph.links.len(),
        report.skipped.len(),
        root.display()
    );
    let rows: Vec<Vec<String>> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| {
            vec![
                (i + 1).to_string(),
                n.id.clone(),
                n.file_type.clone(),
                n.size.to_string(),
                graph.out_degree(&n.id).to_string(),
            ]
        })
        .collect();
    out.push_str(&table::render_aligned(
        &["#", "File", "Type", "Bytes", "Imports"],
        &rows,
        &[Align::Right, Align::Left, Align::Left, Align::Right, Align::Right],
    ));
    if !graph.links.is_empty() {
        let rows: Vec<Vec<String>> =
            graph.links.iter().map(|l| vec![l.source.clone(), l.target.clone()]).collect();
        out.push('\n');
        out.push_str(&table::render(&["Source", "Target"], &rows));
    }
    out
}

fn graph_json(graph: &Graph, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(graph)
    } else {
        serde_json::to_string(graph)
    }
}

/// Run the CLI logic in-process.
///
/// Returns an exit code (0 = success).
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let bin_name = env!("CARGO_PKG_NAME");
            generate(shell, &mut cmd, bin_name, &mut io::stdout());
            0
        }
        Commands::Scan {
            path,
            config: config_path,
            json,
            format,
            no_ignore,
            keep_duplicates,
            prune_dangling,
            jobs,
        } => {
            let cfg = match config_path.as_deref() {
                Some(p) => {
                    let loaded = config::load_config_at(p);
                    if loaded.is_none() {
                        tracing::warn!(config = %p.display(), "config not loaded; using defaults");
                    }
                    loaded
                }
                None => config::load_config_near(&path),
            };

            let mut opts = cfg.as_ref().map(Config::scan_options).unwrap_or_default();
            if no_ignore {
                opts.respect_gitignore = false;
            }
            if keep_duplicates {
                opts.dedupe_links = false;
            }
            if prune_dangling {
                opts.prune_dangling = true;
            }
            if jobs.is_some() {
                opts.jobs = jobs;
            }
            let pretty = cfg
                .as_ref()
                .and_then(|c| c.output.as_ref())
                .and_then(|o| o.pretty)
                .unwrap_or(true);
            let fmt = resolve_format(format, cfg.as_ref());

            let report = match Scanner::new(opts).scan_report(&path) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Scan failed: {e}");
                    return 1;
                }
            };

            if let Some(json_path) = json {
                if let Err(e) = report.graph.save_json(&json_path, pretty) {
                    eprintln!("Failed to write JSON output {}: {e}", json_path.display());
                    return 1;
                }
            }

            match fmt {
                OutputFormat::Json => match graph_json(&report.graph, pretty) {
                    Ok(s) => println!("{s}"),
                    Err(e) => {
                        eprintln!("JSON encode error: {e}");
                        return 1;
                    }
                },
                OutputFormat::Text => {
                    if !cli.quiet {
                        println!("{}", render_text(&path, &report));
                    }
                }
            }
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Link, Node};
    use crate::utils::config::OutputConfig;

    #[test]
    fn format_flag_beats_config() {
        let cfg = Config {
            output: Some(OutputConfig { format: Some("json".into()), pretty: None }),
            ..Config::default()
        };
        assert_eq!(resolve_format(None, Some(&cfg)), OutputFormat::Json);
        assert_eq!(resolve_format(Some(OutputFormat::Text), Some(&cfg)), OutputFormat::Text);
        assert_eq!(resolve_format(None, None), OutputFormat::Text);
    }

    #[test]
    fn text_summary_lists_nodes_and_links() {
        let graph = Graph {
            nodes: vec![Node {
                id: "a.ts".into(),
                name: "a.ts".into(),
                file_type: ".ts".into(),
                size: 12,
                preview: String::new(),
            }],
            links: vec![Link::new("a.ts", "b.ts")],
        };
        let report = ScanReport { graph, skipped: Vec::new() };
        let text = render_text(Path::new("/proj"), &report);
        assert!(text.starts_with("Scanned 1 files, 1 links (0 skipped) under /proj"));
        assert!(text.contains("| a.ts"));
        assert!(text.contains("| Source"));
    }
}
