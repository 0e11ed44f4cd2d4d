//! Job pricing.
//!
//! This module turns a week's completed jobs into priced invoice lines by
//! looking each job's truck type up in the fleet rate card effective for
//! the week-ending date.

use chrono::NaiveDate;

use crate::config::FleetConfig;
use crate::error::EngineResult;
use crate::models::{CompletedJob, GstRegime, InvoiceLine};

use super::line_amounts::calculate_line_amounts;

/// Prices a set of completed jobs into job-derived invoice lines.
///
/// Each produced line carries the job's id as `source_job_id`, which is what
/// later makes it eligible for lunch-break derivation.
///
/// # Arguments
///
/// * `jobs` - The completed jobs grouped into this billing week
/// * `week_ending` - The billing week's date, used to select the rate card
/// * `config` - The fleet configuration holding per-truck-type rates
/// * `regime` - The driver's GST regime
///
/// # Returns
///
/// Returns one line per job in input order, or an error if a truck type has
/// no rate effective for the date (`RateNotFound`).
pub fn price_job_lines(
    jobs: &[CompletedJob],
    week_ending: NaiveDate,
    config: &FleetConfig,
    regime: &GstRegime,
) -> EngineResult<Vec<InvoiceLine>> {
    let mut lines = Vec::with_capacity(jobs.len());

    for job in jobs {
        let rate = config.hourly_rate(&job.truck_type, week_ending)?;
        let amounts = calculate_line_amounts(job.charged_hours, rate, regime)?;

        lines.push(InvoiceLine {
            source_job_id: Some(job.id),
            truck_type: job.truck_type.clone(),
            description: job.description.clone(),
            charged_hours: job.charged_hours,
            rate_per_hour: rate,
            amount_ex_gst: amounts.amount_ex_gst,
            gst_amount: amounts.gst_amount,
            amount_inc_gst: amounts.amount_inc_gst,
        });
    }

    Ok(lines)
}
