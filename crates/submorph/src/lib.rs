//! The orchestrator. Ties every other `submorph-*` crate together into
//! the single public entry point, `Inducer::learn_patterns`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod grouping;

use std::sync::Arc;
use submorph_cluster::{build_closures, Strategy};
use submorph_core::{
    Cancel, DSLTemplate, Error, InducerOptions, Logger, Mode, NullLogger, Result, Statistics,
    StrategyCounts,
};
use submorph_editdist::EditDistanceMemo;
use submorph_tokenizer::tokenize;

/// Drives the full pattern-induction pipeline over a configured
/// [`InducerOptions`].
pub struct Inducer {
    options: InducerOptions,
    logger: Arc<dyn Logger>,
}

impl Inducer {
    /// Build an inducer with the given options and a silent logger.
    #[must_use]
    pub fn new(options: InducerOptions) -> Self {
        Self {
            options,
            logger: Arc::new(NullLogger),
        }
    }

    /// Build an inducer that reports skips and stage transitions through
    /// `logger`.
    #[must_use]
    pub fn with_logger(options: InducerOptions, logger: Arc<dyn Logger>) -> Self {
        Self { options, logger }
    }

    /// Learn generative patterns from `domains`.
    ///
    /// # Errors
    /// Returns [`Error::EmptyInput`] only when `domains` is empty; every
    /// other per-item failure is logged and the offending item skipped.
    pub fn learn_patterns(&self, domains: &[String]) -> Result<(Vec<DSLTemplate>, Statistics)> {
        self.learn_patterns_with_cancel(domains, &Cancel::new())
    }

    /// As [`Self::learn_patterns`], but cooperative cancellation is checked
    /// throughout: affinity propagation and per-level-group closure
    /// construction both return their best-so-far result once `cancel` is
    /// set.
    ///
    /// # Errors
    /// See [`Self::learn_patterns`].
    pub fn learn_patterns_with_cancel(
        &self,
        domains: &[String],
        cancel: &Cancel,
    ) -> Result<(Vec<DSLTemplate>, Statistics)> {
        if domains.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mode = self.options.mode_override.unwrap_or_else(|| Mode::select(domains.len()));
        let params = mode.params();
        self.logger.on_stage("mode", &format!("{mode:?}"));

        let delta_lo = self.options.delta_lo.unwrap_or(params.delta_lo);
        let delta_hi = self.options.delta_hi.unwrap_or(params.delta_hi);
        let max_group_size = self.options.max_group_size.unwrap_or(params.max_group_size);
        let target_coverage = self.options.target_coverage.unwrap_or(params.target_coverage);
        let elbow_sensitivity = self.options.elbow_sensitivity.unwrap_or(params.elbow_sensitivity);
        let min_patterns = self.options.min_patterns.unwrap_or(params.min_patterns);
        let max_patterns = self.options.max_patterns.unwrap_or(params.max_patterns);

        let mut strategies = vec![Strategy::Global];
        if params.enable_strategy2 {
            strategies.push(Strategy::NgramPrefix);
        }
        if params.enable_strategy3 {
            strategies.push(Strategy::Token);
        }

        let mut tokenized = Vec::with_capacity(domains.len());
        for d in domains {
            match tokenize(d) {
                Ok(t) => tokenized.push(t),
                Err(e) => self.logger.on_skip("tokenize", &e),
            }
        }
        let filtered_domains = tokenized.len();

        let groups = grouping::group_by_level(&tokenized);
        self.logger.on_stage("group_by_level", &format!("{} groups", groups.len()));

        let mut strategy_patterns = StrategyCounts::default();
        let mut raw_patterns: Vec<DSLTemplate> = Vec::new();

        for group in &groups {
            if cancel.is_set() {
                break;
            }
            self.logger.on_stage("level_group", &format!("level={} root={}", group.level_count, group.root));

            let memo = EditDistanceMemo::new();
            memo.precompute_parallel(&group.domains, cancel);

            strategy_patterns.global += build_closures(
                &group.domains,
                delta_lo,
                delta_hi,
                &[Strategy::Global],
                &memo,
                max_group_size,
                cancel,
            )
            .len();
            if params.enable_strategy2 {
                strategy_patterns.ngram += build_closures(
                    &group.domains,
                    delta_lo,
                    delta_hi,
                    &[Strategy::NgramPrefix],
                    &memo,
                    max_group_size,
                    cancel,
                )
                .len();
            }
            if params.enable_strategy3 {
                strategy_patterns.token += build_closures(
                    &group.domains,
                    delta_lo,
                    delta_hi,
                    &[Strategy::Token],
                    &memo,
                    max_group_size,
                    cancel,
                )
                .len();
            }

            let closures = build_closures(
                &group.domains,
                delta_lo,
                delta_hi,
                &strategies,
                &memo,
                max_group_size,
                cancel,
            );

            for closure in closures {
                let dsl = match submorph_dsl::generate(&closure, self.options.dictionary.as_ref()) {
                    Ok(dsl) => dsl,
                    Err(e) => {
                        self.logger.on_skip("dsl_generate", &e);
                        continue;
                    }
                };
                if let Err(e) = submorph_quality::evaluate(&dsl, &self.options, mode, domains.len()) {
                    self.logger.on_skip("quality", &e);
                    continue;
                }
                raw_patterns.push(dsl);
            }
        }

        let raw_pattern_count = raw_patterns.len();
        let deduped = if self.options.enable_dedupe {
            dedup_by_template(raw_patterns)
        } else {
            raw_patterns
        };
        let after_dedup = deduped.len();

        let survivors = if self.options.enable_compression {
            filter_subsumed(&deduped)
        } else {
            deduped
        };

        let (merged, _metrics) =
            submorph_affinity::cluster_and_merge(&survivors, self.options.merge_strategy, params.ap_iterations, cancel);
        let after_ap = merged.len();

        let final_templates = submorph_budget::select(
            &merged,
            target_coverage,
            elbow_sensitivity,
            min_patterns,
            max_patterns,
        );

        let statistics = Statistics {
            input_domains: domains.len(),
            filtered_domains,
            level_groups: groups.len(),
            strategy_patterns,
            raw_patterns: raw_pattern_count,
            after_dedup,
            after_ap,
            final_patterns: final_templates.len(),
            mode: Some(mode),
        };
        self.logger.on_summary(&format!("{} final patterns", final_templates.len()));

        Ok((final_templates, statistics))
    }
}

/// Keep only the first occurrence of each distinct template string, in
/// first-seen order.
fn dedup_by_template(templates: Vec<DSLTemplate>) -> Vec<DSLTemplate> {
    let mut seen = std::collections::HashSet::new();
    templates
        .into_iter()
        .filter(|t| seen.insert(t.template.clone()))
        .collect()
}

/// Drop every template subsumed by some other surviving template.
fn filter_subsumed(templates: &[DSLTemplate]) -> Vec<DSLTemplate> {
    templates
        .iter()
        .enumerate()
        .filter(|(i, t)| !templates.iter().enumerate().any(|(j, other)| *i != j && other.subsumes(t)))
        .map(|(_, t)| t.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use submorph_core::InducerOptions;

    #[test]
    fn empty_input_is_the_only_fatal_error() {
        let inducer = Inducer::new(InducerOptions::default());
        let err = inducer.learn_patterns(&[]).unwrap_err();
        assert_eq!(err, Error::EmptyInput);
    }

    #[test]
    fn numbered_hosts_yield_surviving_patterns_and_consistent_statistics() {
        let domains: Vec<String> = (0..20)
            .map(|i| format!("host-{i:02}.example.com"))
            .collect();
        let inducer = Inducer::new(InducerOptions {
            min_coverage: Some(2),
            ..InducerOptions::default()
        });
        let (templates, stats) = inducer.learn_patterns(&domains).unwrap();
        assert!(!templates.is_empty());
        assert_eq!(stats.input_domains, 20);
        assert_eq!(stats.filtered_domains, 20);
        assert!(stats.final_patterns <= stats.after_ap);
        assert_eq!(stats.final_patterns, templates.len());
    }

    #[test]
    fn invalid_domains_are_skipped_not_fatal() {
        let domains = vec!["not a host".to_string(), "also*bad".to_string()];
        let inducer = Inducer::new(InducerOptions::default());
        let (templates, stats) = inducer.learn_patterns(&domains).unwrap();
        assert!(templates.is_empty());
        assert_eq!(stats.filtered_domains, 0);
    }

    #[test]
    fn mode_override_changes_delta_and_budget_bounds_when_options_are_left_default() {
        let domains: Vec<String> = (0..20)
            .map(|i| format!("host-{i:02}.example.com"))
            .collect();

        let fast = Inducer::new(InducerOptions {
            min_coverage: Some(2),
            mode_override: Some(Mode::Fast),
            ..InducerOptions::default()
        });
        let (_, fast_stats) = fast.learn_patterns(&domains).unwrap();
        assert_eq!(fast_stats.mode, Some(Mode::Fast));

        let thorough = Inducer::new(InducerOptions {
            min_coverage: Some(2),
            mode_override: Some(Mode::Thorough),
            ..InducerOptions::default()
        });
        let (_, thorough_stats) = thorough.learn_patterns(&domains).unwrap();
        assert_eq!(thorough_stats.mode, Some(Mode::Thorough));

        // Fast's wider max_patterns/looser target_coverage and Thorough's
        // wider delta range both flow through only when options leave the
        // corresponding fields unset.
        assert_eq!(Mode::Fast.params().max_patterns, 80);
        assert_eq!(Mode::Balanced.params().max_patterns, 60);
        assert_eq!(Mode::Thorough.params().delta_hi, 3);
        assert_eq!(Mode::Balanced.params().delta_hi, 2);
    }

    #[test]
    fn explicit_option_overrides_the_mode_default() {
        let domains: Vec<String> = (0..20)
            .map(|i| format!("host-{i:02}.example.com"))
            .collect();
        let inducer = Inducer::new(InducerOptions {
            min_coverage: Some(2),
            mode_override: Some(Mode::Fast),
            delta_hi: Some(3),
            ..InducerOptions::default()
        });
        // Fast mode alone would cap delta_hi at 1; the explicit Some(3)
        // must win.
        assert!(inducer.learn_patterns(&domains).is_ok());
        assert_eq!(inducer.options.delta_hi, Some(3));
    }

    #[test]
    fn disabling_dedupe_can_keep_duplicate_template_strings() {
        let domains: Vec<String> = (0..10)
            .map(|i| format!("host-{i:02}.example.com"))
            .collect();
        let inducer = Inducer::new(InducerOptions {
            min_coverage: Some(2),
            enable_dedupe: false,
            ..InducerOptions::default()
        });
        assert!(inducer.learn_patterns(&domains).is_ok());
    }

    #[test]
    fn subsumption_filter_drops_smaller_covered_templates() {
        let domains: Vec<String> = ["dev", "prod", "staging"]
            .iter()
            .flat_map(|env| (0..5).map(move |i| format!("{env}-{i}.example.com")))
            .collect();
        let inducer = Inducer::new(InducerOptions {
            min_coverage: Some(2),
            mode_override: Some(Mode::Thorough),
            ..InducerOptions::default()
        });
        let (templates, _) = inducer.learn_patterns(&domains).unwrap();
        // No surviving template should subsume another surviving one.
        for a in &templates {
            for b in &templates {
                assert!(!a.subsumes(b), "{:?} subsumes {:?}", a.template, b.template);
            }
        }
    }
}
