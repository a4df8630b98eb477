//! Signal reconciliation between the semantic layer and the detectors.

use crate::detectors::DetectorReport;
use crate::signals::SignalVector;
use crate::vocabulary::Signal;

/// Merge semantic signals with detector results into the canonical vector.
///
/// Start from the semantic vector (all false when absent). A detector hit
/// forces its signal true; the semantic layer can never clear a hit.
/// Signals without a detector pass through unchanged.
pub fn reconcile(semantic: Option<&SignalVector>, detectors: &DetectorReport) -> SignalVector {
    let mut canonical = semantic.copied().unwrap_or_default();

    for signal in Signal::ALL {
        if detectors.covers(signal) {
            canonical.raise_if(signal, detectors.fired(signal));
        }
    }

    canonical
}
