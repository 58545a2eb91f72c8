use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// The eight chart types offered by the dashboard selector.
///
/// Declaration order is selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    #[default]
    RadialBar,
    Radar,
    Nightingale,
    Donut,
    Treemap,
    Sunburst,
    Chord,
    Network,
}

impl ChartKind {
    /// Selector order; the first entry is the default selection.
    pub const ALL: [Self; 8] = [
        Self::RadialBar,
        Self::Radar,
        Self::Nightingale,
        Self::Donut,
        Self::Treemap,
        Self::Sunburst,
        Self::Chord,
        Self::Network,
    ];

    /// Label shown in the chart-type selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RadialBar => "Radial Bar Chart",
            Self::Radar => "Radar Chart",
            Self::Nightingale => "Nightingale Chart",
            Self::Donut => "Donut Chart",
            Self::Treemap => "Treemap Chart",
            Self::Sunburst => "Sunburst Chart",
            Self::Chord => "Chord Diagram",
            Self::Network => "Network Diagram",
        }
    }

    /// Short command-line spelling.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::RadialBar => "radial-bar",
            Self::Radar => "radar",
            Self::Nightingale => "nightingale",
            Self::Donut => "donut",
            Self::Treemap => "treemap",
            Self::Sunburst => "sunburst",
            Self::Chord => "chord",
            Self::Network => "network",
        }
    }

    /// Index into [`Self::ALL`]; variants are declared in selector order.
    #[must_use]
    pub const fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    /// Accepts either the slug (`radial-bar`) or the selector label, ignoring case.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let needle = input.trim();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.slug().eq_ignore_ascii_case(needle) || kind.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ChartError::InvalidData(format!("unknown chart type `{needle}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::ChartKind;

    #[test]
    fn parses_slug_and_label() {
        assert_eq!("donut".parse::<ChartKind>().ok(), Some(ChartKind::Donut));
        assert_eq!(
            "network diagram".parse::<ChartKind>().ok(),
            Some(ChartKind::Network)
        );
        assert!("pie".parse::<ChartKind>().is_err());
    }

    #[test]
    fn positions_follow_selector_order() {
        for (index, kind) in ChartKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.position(), index);
            assert_eq!(ChartKind::ALL[kind.position()], kind);
        }
    }
}
