// crates/submorph-quality/src/lib.rs

//! Decides whether a generated template is worth keeping.
//!
//! Three independent gates, any of which can reject: a minimum coverage
//! (from the active [`Mode`]), an adaptive confidence floor (from the
//! total input size), and a generativity-ratio cap (flat, or graduated by
//! coverage) applied once estimated generations clear an absolute
//! threshold.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use submorph_core::{DSLTemplate, Error, InducerOptions, Mode, Result};

/// Evaluate `template` against `options`/`mode`, given the total number of
/// domains the whole run started from (`dataset_size`, used for the
/// adaptive confidence floor).
///
/// # Errors
/// Returns [`Error::QualityRejected`] with a human-readable reason on the
/// first failing gate.
pub fn evaluate(
    template: &DSLTemplate,
    options: &InducerOptions,
    mode: Mode,
    dataset_size: usize,
) -> Result<()> {
    let min_coverage = options.min_coverage.unwrap_or_else(|| mode.params().min_coverage);
    if template.coverage < min_coverage {
        return Err(Error::QualityRejected {
            template: template.template.clone(),
            reason: format!(
                "coverage {} below minimum {min_coverage}",
                template.coverage
            ),
        });
    }

    let floor = confidence_floor(dataset_size);
    if template.confidence < floor {
        return Err(Error::QualityRejected {
            template: template.template.clone(),
            reason: format!(
                "confidence {:.3} below adaptive floor {floor:.2}",
                template.confidence
            ),
        });
    }

    let estimated = submorph_dfa::estimate_generations(template).map_err(|e| {
        Error::QualityRejected {
            template: template.template.clone(),
            reason: format!("could not estimate generativity: {e}"),
        }
    })?;

    if estimated < options.absolute_threshold {
        return Ok(());
    }

    let max_ratio = if options.graduated_ratio_caps {
        graduated_cap(template.coverage)
    } else {
        options.max_ratio
    };

    if template.ratio > max_ratio {
        return Err(Error::QualityRejected {
            template: template.template.clone(),
            reason: format!("ratio {:.2} exceeds cap {max_ratio:.2}", template.ratio),
        });
    }

    Ok(())
}

/// Tighter caps for thinly-covered templates, looser for well-covered
/// ones: 40 below coverage 10, 60 below 50, 100 otherwise.
#[must_use]
fn graduated_cap(coverage: usize) -> f64 {
    if coverage < 10 {
        40.0
    } else if coverage < 50 {
        60.0
    } else {
        100.0
    }
}

/// Confidence floor by dataset-size band, reusing [`Mode::select`]'s
/// thorough/balanced/fast thresholds: 0.30/0.15/0.10.
#[must_use]
fn confidence_floor(dataset_size: usize) -> f64 {
    match Mode::select(dataset_size) {
        Mode::Thorough => 0.30,
        Mode::Balanced => 0.15,
        Mode::Fast => 0.10,
    }
}
