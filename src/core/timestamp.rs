use chrono::{DateTime, Utc};

/// Gateway timestamp formats.
///
/// All timestamps are taken as UTC by the caller and rendered here in the
/// compact forms the gateway and merchant references use.
pub struct GatewayTimestamp;

impl GatewayTimestamp {
    /// `TrxDateTime` / `RequestDateTime` format: `YYYYMMDDHHMMSS`
    pub fn trx_datetime(time: DateTime<Utc>) -> String {
        time.format("%Y%m%d%H%M%S").to_string()
    }

    /// Disambiguator appended to the order id in a merchant reference:
    /// `yymmddHHMMSSmmm`, millisecond resolution
    pub fn reference_suffix(time: DateTime<Utc>) -> String {
        time.format("%y%m%d%H%M%S%3f").to_string()
    }
}

/// Build the merchant reference for one checkout attempt: `{order_id}_{yymmddHHMMSSmmm}`
pub fn merchant_reference(order_id: &str, time: DateTime<Utc>) -> String {
    format!("{}_{}", order_id, GatewayTimestamp::reference_suffix(time))
}

/// Recover the order id from a merchant reference echoed in a callback.
///
/// The order id is everything before the final `_`. Returns `None` when the
/// reference has no separator or an empty order part.
pub fn order_id_from_reference(reference: &str) -> Option<&str> {
    let (order_id, _suffix) = reference.rsplit_once('_')?;
    if order_id.is_empty() {
        None
    } else {
        Some(order_id)
    }
}
