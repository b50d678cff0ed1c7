//! CSV writers for the per-order departure records and the queue-size
//! sample series.

use crate::models::order::DepartureRecord;
use crate::report::ReportError;
use crate::telemetry::SampleSeries;
use std::io::Write;

/// Write the per-order lifecycle CSV.
///
/// One row per **delivered** order, in delivery order:
/// `id,express,arrival,delivered,final_stage,time_in_system`.
/// Cancelled records are skipped; they appear in the aggregate counts only.
pub fn write_departures_csv<W: Write>(
    out: &mut W,
    records: &[DepartureRecord],
) -> Result<(), ReportError> {
    writeln!(out, "id,express,arrival,delivered,final_stage,time_in_system")?;
    for record in records.iter().filter(|r| r.is_delivered()) {
        writeln!(
            out,
            "{},{},{:.3},{:.3},DELIVERED,{:.3}",
            record.id,
            record.priority.is_express() as u8,
            record.arrival_time,
            record.departed_time,
            record.sojourn,
        )?;
    }
    Ok(())
}

/// Write the periodic queue-size series: `time,queue_size`.
pub fn write_samples_csv<W: Write>(
    out: &mut W,
    series: &SampleSeries,
) -> Result<(), ReportError> {
    writeln!(out, "time,queue_size")?;
    for (time, size) in series.as_slice() {
        writeln!(out, "{:.3},{}", time, size)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::{Order, Priority};
    use crate::models::stage::Stage;

    #[test]
    fn test_departures_csv_rows_are_delivered_only() {
        let mut delivered = Order::new(1, Priority::Express, 2.0);
        delivered.stage = Stage::Delivered;
        delivered.delivered_time = Some(5.5);

        let mut cancelled = Order::new(2, Priority::Normal, 3.0);
        cancelled.stage = Stage::Packed;

        let records = vec![
            DepartureRecord::delivered(delivered),
            DepartureRecord::cancelled(cancelled, 4.0),
        ];

        let mut buf = Vec::new();
        write_departures_csv(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2, "header plus one delivered row");
        assert_eq!(lines[0], "id,express,arrival,delivered,final_stage,time_in_system");
        assert_eq!(lines[1], "1,1,2.000,5.500,DELIVERED,3.500");
    }

    #[test]
    fn test_samples_csv_format() {
        let mut series = SampleSeries::default();
        series.push(5.0, 3);
        series.push(10.0, 0);

        let mut buf = Vec::new();
        write_samples_csv(&mut buf, &series).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text, "time,queue_size\n5.000,3\n10.000,0\n");
    }
}
