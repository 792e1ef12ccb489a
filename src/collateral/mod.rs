pub mod appraisal;
pub mod ltv;

pub use appraisal::{Appraisal, AppraisalRates, Ornaments};
pub use ltv::{LtvCalculator, LtvStatus};
