//! Held-out evaluation report
//!
//! Accuracy and the macro/support-weighted averages come from aprender's
//! classification metrics; per-class rows are read off its confusion matrix.
//! None of this is served to end users.

use std::fmt;

use aprender::metrics::classification::{
    accuracy, confusion_matrix, f1_score, precision, recall, Average,
};
use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;
use crate::types::ClassId;

fn check_lengths(y_pred: &[ClassId], y_true: &[ClassId]) -> Result<(), ClassifierError> {
    if y_true.is_empty() {
        return Err(ClassifierError::EmptyDataset);
    }
    if y_pred.len() != y_true.len() {
        return Err(ClassifierError::LengthMismatch {
            rows: y_pred.len(),
            labels: y_true.len(),
        });
    }
    Ok(())
}

/// Metrics for one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of true instances in the evaluated set
    pub support: usize,
}

/// Averaged precision/recall/F1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Per-class evaluation report on a held-out partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub classes: Vec<ClassMetrics>,
    /// Unweighted mean over class ids up to the largest one evaluated
    pub macro_avg: AveragedMetrics,
    pub weighted_avg: AveragedMetrics,
    pub total_support: usize,
}

impl ClassificationReport {
    /// Build a report; `labels[i]` names class id `i`. Classes with neither
    /// true nor predicted instances are still listed, with zero scores.
    pub fn new(
        y_pred: &[ClassId],
        y_true: &[ClassId],
        labels: &[String],
    ) -> Result<Self, ClassifierError> {
        check_lengths(y_pred, y_true)?;
        let n_classes = labels.len();
        if let Some(&id) = y_pred.iter().chain(y_true.iter()).find(|&&id| id >= n_classes) {
            return Err(ClassifierError::InvalidParameter(format!(
                "class id {} has no label (report covers {} classes)",
                id, n_classes
            )));
        }

        // Rows are true classes, columns predictions; ids past the largest
        // one seen have no row or column.
        let cm = confusion_matrix(y_pred, y_true);
        let seen = cm.n_rows();
        let count = |t: usize, p: usize| if t < seen && p < seen { cm.get(t, p) } else { 0 };

        let classes: Vec<ClassMetrics> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let tp = count(i, i);
                let predicted: usize = (0..seen).map(|t| count(t, i)).sum();
                let support: usize = (0..seen).map(|p| count(i, p)).sum();
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                ClassMetrics {
                    label: label.clone(),
                    precision,
                    recall,
                    f1: f1(precision, recall),
                    support,
                }
            })
            .collect();

        let averaged = |average: Average| AveragedMetrics {
            precision: f64::from(precision(y_pred, y_true, average)),
            recall: f64::from(recall(y_pred, y_true, average)),
            f1: f64::from(f1_score(y_pred, y_true, average)),
        };

        Ok(Self {
            accuracy: f64::from(accuracy(y_pred, y_true)),
            classes,
            macro_avg: averaged(Average::Macro),
            weighted_avg: averaged(Average::Weighted),
            total_support: y_true.len(),
        })
    }

    pub fn class(&self, label: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.label == label)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.len())
            .chain(["weighted avg".len()])
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.total_support
        )?;
        for (name, avg) in [
            ("macro avg", &self.macro_avg),
            ("weighted avg", &self.weighted_avg),
        ] {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1, self.total_support
            )?;
        }
        Ok(())
    }
}
