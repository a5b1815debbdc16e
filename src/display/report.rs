use crate::compute::Evaluation;
use crate::store::{CalculatorDescriptor, Listing};
use std::fmt::Write;

/// One line per calculator, grouped under category headers in listing order.
pub fn format_catalog(listing: &Listing) -> String {
    let mut output = String::new();
    let mut current: Option<&str> = None;

    for d in listing {
        if current != Some(d.category.as_str()) {
            let _ = writeln!(output, "[{}]", d.category);
            current = Some(d.category.as_str());
        }
        if d.subcategory.is_empty() {
            let _ = writeln!(output, "  {:<20} {}", d.id, d.title);
        } else {
            let _ = writeln!(output, "  {:<20} {} ({})", d.id, d.title, d.subcategory);
        }
    }
    if output.is_empty() {
        output.push_str("(no calculators)\n");
    }
    output
}

pub fn format_evaluation(descriptor: &CalculatorDescriptor, evaluation: &Evaluation) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{} [{}]", descriptor.title, descriptor.id);
    let _ = writeln!(output, "--------------------------------------------------");

    match evaluation {
        Evaluation::Invalid(outcome) => {
            let _ = writeln!(output, "Invalid input:");
            for e in &outcome.errors {
                let _ = writeln!(output, "  - {}", e);
            }
        }
        Evaluation::Computed(r) => {
            let _ = writeln!(output, "Result: {:.4}", r.result);
            for (name, value) in &r.breakdown {
                let _ = writeln!(output, "  {:<24} {:.4}", name, value);
            }
            if let Some(text) = &r.analysis {
                let _ = writeln!(output, "Analysis: {}", text);
            }
            if let Some(a) = &r.assessment {
                let _ = writeln!(output, "Risk: {:?} - {}", a.risk_level, a.recommendation);
            }
        }
    }
    output
}
