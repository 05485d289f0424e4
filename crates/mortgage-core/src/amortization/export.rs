//! CSV export of an amortisation schedule.

use std::io::Write;

use super::schedule::PeriodRecord;
use crate::error::MortgageError;
use crate::MortgageResult;

/// Decimal places written for monetary columns.
const EXPORT_DP: u32 = 2;

/// Write the schedule as CSV with a header row.
///
/// The `Payment Date` column is included only when every period is dated.
pub fn write_schedule_csv<W: Write>(records: &[PeriodRecord], writer: W) -> MortgageResult<()> {
    let dated = !records.is_empty() && records.iter().all(|r| r.payment_date.is_some());
    let mut wtr = csv::Writer::from_writer(writer);

    if dated {
        wtr.write_record(["Payment #", "Payment Date", "Remaining Balance", "Cumulative Interest"])?;
    } else {
        wtr.write_record(["Payment #", "Remaining Balance", "Cumulative Interest"])?;
    }

    for r in records {
        let period = r.period.to_string();
        let balance = r.remaining_balance.round_dp(EXPORT_DP).to_string();
        let interest = r.cumulative_interest.round_dp(EXPORT_DP).to_string();
        match r.payment_date.filter(|_| dated) {
            Some(date) => {
                wtr.write_record([period, date.format("%Y-%m-%d").to_string(), balance, interest])?
            }
            None => wtr.write_record([period, balance, interest])?,
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Render the schedule as a CSV string.
pub fn schedule_to_csv(records: &[PeriodRecord]) -> MortgageResult<String> {
    let mut buf = Vec::new();
    write_schedule_csv(records, &mut buf)?;
    String::from_utf8(buf).map_err(|e| MortgageError::ExportError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_undated_schedule() {
        let records = vec![
            PeriodRecord {
                period: 1,
                payment_date: None,
                remaining_balance: dec!(7600),
                cumulative_interest: dec!(100),
            },
            PeriodRecord {
                period: 2,
                payment_date: None,
                remaining_balance: dec!(5176.004),
                cumulative_interest: dec!(176.126),
            },
        ];
        let csv = schedule_to_csv(&records).unwrap();
        assert_eq!(
            csv,
            "Payment #,Remaining Balance,Cumulative Interest\n1,7600,100\n2,5176.00,176.13\n"
        );
    }

    #[test]
    fn test_dated_schedule() {
        let records = vec![PeriodRecord {
            period: 1,
            payment_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            remaining_balance: dec!(99.5),
            cumulative_interest: dec!(0.5),
        }];
        let csv = schedule_to_csv(&records).unwrap();
        assert_eq!(
            csv,
            "Payment #,Payment Date,Remaining Balance,Cumulative Interest\n1,2025-03-01,99.5,0.5\n"
        );
    }

    #[test]
    fn test_empty_schedule_has_header_only() {
        let csv = schedule_to_csv(&[]).unwrap();
        assert_eq!(csv, "Payment #,Remaining Balance,Cumulative Interest\n");
    }
}
