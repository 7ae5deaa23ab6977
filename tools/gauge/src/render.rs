//! Terminal rendering of an assessment

use clearflow_quality::{Assessment, Tone};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

fn paint(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Neutral => text.dimmed(),
        Tone::Good => text.green().bold(),
        Tone::Warning => text.yellow().bold(),
        Tone::Critical => text.red().bold(),
    }
}

fn value_or_dash(value: Option<f64>, decimals: usize, unit: &str) -> String {
    match value {
        Some(v) if unit.is_empty() => format!("{:.*}", decimals, v),
        Some(v) => format!("{:.*} {}", decimals, v, unit),
        None => "--".to_string(),
    }
}

/// Multi-line dashboard block for one poll
pub fn render_assessment(assessment: &Assessment) -> String {
    let mut out = String::new();
    let updated = assessment.timestamp.as_deref().unwrap_or("--");

    let _ = writeln!(out, "{} {}", "Water Quality".bold(), format!("@ {}", updated).dimmed());
    let _ = writeln!(
        out,
        "  Overall    {}",
        paint(assessment.overall.label(), assessment.overall.tone())
    );

    let ph = &assessment.ph;
    let _ = writeln!(
        out,
        "  pH         {:<10} {}",
        value_or_dash(assessment.ph_value, 2, ""),
        paint(&ph.label, ph.tone)
    );
    let _ = writeln!(out, "             {}", ph.suggestion.dimmed());

    let turbidity = &assessment.turbidity;
    let _ = writeln!(
        out,
        "  Turbidity  {:<10} {}",
        value_or_dash(assessment.turbidity_value, 1, "NTU"),
        paint(&turbidity.status.label, turbidity.status.tone)
    );
    let _ = writeln!(out, "             {}", turbidity.status.suggestion.dimmed());
    let _ = writeln!(
        out,
        "             {}{}",
        turbidity.message,
        turbidity.standard_detail.as_deref().unwrap_or("")
    );

    if !assessment.recommendations.is_empty() {
        let _ = writeln!(out, "  {}", "Purification".bold());
        for (i, rec) in assessment.recommendations.iter().enumerate() {
            let _ = writeln!(out, "    {}. {} - {}", i + 1, rec.title.cyan(), rec.description);
        }
    }

    out
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use clearflow_quality::freshness::{FreshPh, FreshTurbidity};
    use clearflow_quality::{FreshReadings, TurbidityMeta};

    fn assessment(ph: Option<f64>, ntu: Option<f64>) -> Assessment {
        colored::control::set_override(false);
        Assessment::from_fresh(&FreshReadings {
            ph: ph.map(|value| FreshPh {
                value,
                ts: None,
                arrived_at: "t".into(),
            }),
            turbidity: ntu.map(|value| FreshTurbidity {
                value,
                meta: TurbidityMeta {
                    standard: Some("WHO".into()),
                    ..Default::default()
                },
                ts: None,
                arrived_at: "t".into(),
            }),
            timestamp: Some("2025-06-01T09:30:00.000Z".into()),
        })
    }

    #[test]
    fn test_waiting_dashboard() {
        let text = render_assessment(&assessment(None, None));
        assert!(text.contains("Overall    Waiting for data"));
        assert!(text.contains("pH         --"));
        assert!(text.contains("Awaiting turbidity reading."));
        assert!(!text.contains("Purification"));
    }

    #[test]
    fn test_full_dashboard() {
        let text = render_assessment(&assessment(Some(9.0), Some(12.0)));
        assert!(text.contains("Attention Needed"));
        assert!(text.contains("9.00"));
        assert!(text.contains("12.0 NTU"));
        assert!(text.contains("Monitoring turbidity levels. (Standard: WHO)"));
        assert!(text.contains("1. pH Adjustment"));
        assert!(text.contains("2. Filtration Required"));
        assert!(text.contains("3. Coagulation & Flocculation"));
    }
}
