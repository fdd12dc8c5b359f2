//! Illustrative driver for `submorph`: reads one hostname per line from
//! stdin (or falls back to a small built-in sample when stdin is empty)
//! and prints the induced templates and run statistics.
//!
//! Not a CLI front end — no argument parsing, no output format options.
//! It exists to exercise the pipeline end to end.

use std::io::{self, IsTerminal, Read};
use std::sync::Arc;
use submorph::Inducer;
use submorph_core::{InducerOptions, TracingLogger};

const SAMPLE_DOMAINS: &[&str] = &[
    "dev-api-01.example.com",
    "dev-api-02.example.com",
    "dev-api-03.example.com",
    "prod-api-01.example.com",
    "prod-api-02.example.com",
    "staging-web.example.com",
    "prod-web.example.com",
    "cdn-eu-west-1.example.com",
    "cdn-us-east-1.example.com",
    "cdn-ap-south-1.example.com",
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let domains = read_domains();
    let inducer = Inducer::with_logger(InducerOptions::default(), Arc::new(TracingLogger));

    match inducer.learn_patterns(&domains) {
        Ok((templates, stats)) => {
            for t in &templates {
                println!(
                    "{}  (coverage={}, ratio={:.2}, confidence={:.2})",
                    t.template, t.coverage, t.ratio, t.confidence
                );
            }
            eprintln!(
                "\n{} domains -> {} final patterns ({} raw, {} after dedup, {} after clustering)",
                stats.input_domains, stats.final_patterns, stats.raw_patterns, stats.after_dedup, stats.after_ap
            );
        }
        Err(e) => {
            eprintln!("induction failed: {e}");
            std::process::exit(1);
        }
    }
}

fn read_domains() -> Vec<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return SAMPLE_DOMAINS.iter().map(|s| (*s).to_string()).collect();
    }

    let mut buf = String::new();
    if stdin.lock().read_to_string(&mut buf).is_err() {
        return SAMPLE_DOMAINS.iter().map(|s| (*s).to_string()).collect();
    }

    let lines: Vec<String> = buf.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect();
    if lines.is_empty() {
        SAMPLE_DOMAINS.iter().map(|s| (*s).to_string()).collect()
    } else {
        lines
    }
}
