//! Vertical offset stacking for display.
//!
//! Ordinals come from the display order, which the caller chooses. The
//! configured default is `DisplayOrder::ReverseLoadOrder`, which puts the
//! first-loaded trace on top; nothing here assumes it.

use super::normalizer::NormalizedSeries;
use crate::utils::error::ConfigError;
use std::collections::HashSet;

/// How series are ranked for display (ordinal 0 is drawn lowest)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayOrder {
    /// Ordinal follows load order
    LoadOrder,

    /// First-loaded series gets the highest ordinal
    #[default]
    ReverseLoadOrder,

    /// Explicit label sequence; must name every series exactly once
    Explicit(Vec<String>),
}

impl DisplayOrder {
    /// Rearrange `items` (given in load order) into display order
    ///
    /// # Errors
    /// * `ConfigError::InvalidValue` - Explicit order is not a permutation of the labels
    pub fn arrange<T>(
        &self,
        items: Vec<T>,
        label_of: impl Fn(&T) -> &str,
    ) -> Result<Vec<T>, ConfigError> {
        match self {
            DisplayOrder::LoadOrder => Ok(items),
            DisplayOrder::ReverseLoadOrder => Ok(items.into_iter().rev().collect()),
            DisplayOrder::Explicit(order) => {
                check_permutation(order, items.iter().map(&label_of))?;

                let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
                let mut arranged = Vec::with_capacity(slots.len());
                for wanted in order {
                    let idx = slots
                        .iter()
                        .position(|s| s.as_ref().is_some_and(|item| label_of(item) == wanted))
                        .ok_or_else(|| unknown_label(wanted))?;
                    if let Some(item) = slots[idx].take() {
                        arranged.push(item);
                    }
                }
                Ok(arranged)
            }
        }
    }
}

/// Verify an explicit order names each label exactly once
pub fn check_permutation<'a>(
    order: &[String],
    labels: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let labels: Vec<&str> = labels.collect();
    if order.len() != labels.len() {
        return Err(ConfigError::invalid(
            "display_order",
            format!("lists {} labels for {} series", order.len(), labels.len()),
        ));
    }

    let mut seen = HashSet::new();

    for wanted in order {
        if !seen.insert(wanted.as_str()) {
            return Err(ConfigError::invalid(
                "display_order",
                format!("label '{}' listed more than once", wanted),
            ));
        }
        if !labels.contains(&wanted.as_str()) {
            return Err(unknown_label(wanted));
        }
    }

    if let Some(missing) = labels.iter().find(|l| !seen.contains(*l)) {
        return Err(ConfigError::invalid(
            "display_order",
            format!("series '{}' is not listed", missing),
        ));
    }

    Ok(())
}

fn unknown_label(label: &str) -> ConfigError {
    ConfigError::invalid("display_order", format!("no series labelled '{}'", label))
}

/// One sample with its stacked display value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackedPoint {
    pub time: f64,
    pub intensity: f64,
    pub normalized: f64,
    pub offset: f64,
}

/// A normalized series lifted by `ordinal * offset_step`
#[derive(Debug, Clone, PartialEq)]
pub struct StackedSeries {
    pub label: String,
    pub ordinal: usize,
    pub peak: f64,
    pub baseline: f64,

    /// Constant added to every normalized value
    pub offset: f64,

    pub points: Vec<StackedPoint>,
}

/// Offset one normalized series for display
///
/// **Public** - main entry point for stacking
pub fn stack(series: &NormalizedSeries, ordinal: usize, offset_step: f64) -> StackedSeries {
    let offset = ordinal as f64 * offset_step;

    StackedSeries {
        label: series.label.clone(),
        ordinal,
        peak: series.peak,
        baseline: series.baseline,
        offset,
        points: series
            .points
            .iter()
            .map(|p| StackedPoint {
                time: p.time,
                intensity: p.intensity,
                normalized: p.normalized,
                offset: p.normalized + offset,
            })
            .collect(),
    }
}

/// Arrange series into display order and stack each by its position
pub fn stack_in_order(
    series: Vec<NormalizedSeries>,
    order: &DisplayOrder,
    offset_step: f64,
) -> Result<Vec<StackedSeries>, ConfigError> {
    let arranged = order.arrange(series, |s| s.label.as_str())?;

    Ok(arranged
        .iter()
        .enumerate()
        .map(|(ordinal, s)| stack(s, ordinal, offset_step))
        .collect())
}
