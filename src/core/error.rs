use thiserror::Error;

/// Failures raised while running a scenario. Inputs are validated by the
/// caller; these cover degenerate inputs that still reach the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("scenario covers zero months: months_live_in + months_rent_out must be > 0")]
    EmptyHorizon,

    #[error("scenario covers {months} months; at most {max} are supported")]
    HorizonTooLong { months: u64, max: u32 },

    #[error("{field} is not a finite number; check mortgage_term_years and the rates")]
    NonFinite { field: &'static str },
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, SimulationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimulationError::NonFinite { field })
    }
}
