use crate::domain::model::{AggregateStat, GroupField, GroupKey};
use crate::domain::services::layers::MapPayload;
use crate::utils::error::{EtlError, Result};
use std::collections::BTreeMap;

/// One CSV row per group: the group columns, then the statistics.
pub fn encode_aggregates(
    fields: &[GroupField],
    aggregates: &BTreeMap<GroupKey, AggregateStat>,
) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = fields.iter().map(|f| f.column_name()).collect();
    header.extend(["price_mean", "price_median", "price_count", "price_per_sqm_mean"]);
    writer.write_record(&header)?;

    for (key, stat) in aggregates {
        let mut row: Vec<String> = key.iter().map(|v| v.to_string()).collect();
        row.push(stat.mean_price.to_string());
        row.push(stat.median_price.to_string());
        row.push(stat.count.to_string());
        row.push(
            stat.mean_price_per_area
                .map(|v| v.to_string())
                .unwrap_or_default(),
        );
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

pub fn encode_payload(payload: &MapPayload) -> Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(payload)?;
    data.push(b'\n');
    Ok(data)
}
