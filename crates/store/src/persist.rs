//! Persisted cart format.
//!
//! The cart is stored as one JSON object keyed by product id, each value a
//! full line record:
//!
//! ```json
//! {"p1": {"id": "p1", "name": "Tea", "price": 5, "image": "x", "quantity": 2}}
//! ```
//!
//! Keys appear in cart order. Decoding trusts nothing it reads back: every
//! record is validated on its own and bad records are dropped without
//! discarding the good ones.

use basket_core::CartLine;
use serde_json::{Map, Value};

use crate::error::PersistenceError;

/// A stored record that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Object key the record was stored under.
    pub key: String,
    /// Why the record was dropped.
    pub reason: String,
}

/// Result of decoding a stored cart.
#[derive(Debug, Default)]
pub struct Decoded {
    /// Valid lines, in stored order.
    pub lines: Vec<CartLine>,
    /// Records that were dropped.
    pub rejected: Vec<RejectedRecord>,
}

/// Serialize cart lines into the persisted format.
///
/// # Errors
///
/// Returns [`PersistenceError::Encode`] if a line cannot be serialized.
pub fn encode(lines: &[CartLine]) -> Result<String, PersistenceError> {
    let mut object = Map::with_capacity(lines.len());
    for line in lines {
        let record = serde_json::to_value(line).map_err(PersistenceError::Encode)?;
        object.insert(line.id.to_string(), record);
    }
    serde_json::to_string(&object).map_err(PersistenceError::Encode)
}

/// Parse a persisted cart, validating each record.
///
/// # Errors
///
/// Returns [`PersistenceError::Decode`] if the blob is not a JSON object.
/// Individual bad records are reported in [`Decoded::rejected`] instead.
pub fn decode(blob: &str) -> Result<Decoded, PersistenceError> {
    let object: Map<String, Value> =
        serde_json::from_str(blob).map_err(PersistenceError::Decode)?;

    let mut decoded = Decoded::default();
    for (key, record) in object {
        match serde_json::from_value::<CartLine>(record) {
            Ok(line) if line.id.as_str() == key => decoded.lines.push(line),
            Ok(line) => decoded.rejected.push(RejectedRecord {
                reason: format!("record id `{}` does not match its key", line.id),
                key,
            }),
            Err(e) => decoded.rejected.push(RejectedRecord {
                key,
                reason: e.to_string(),
            }),
        }
    }

    Ok(decoded)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use basket_core::{NewCartLine, Price, ProductId, Quantity};
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn line(id: &str, name: &str, cents: i64, quantity: u32) -> CartLine {
        let mut line = CartLine::from(NewCartLine::new(
            ProductId::parse(id).unwrap(),
            name,
            Price::from_cents(cents).unwrap(),
        ));
        line.quantity = Quantity::new(quantity).unwrap();
        line
    }

    #[test]
    fn test_encode_shape() {
        let blob = encode(&[line("p1", "Tea", 500, 2)]).unwrap();
        let value: Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(
            value,
            json!({"p1": {"id": "p1", "name": "Tea", "price": 5, "image": null, "quantity": 2}})
        );
    }

    #[test]
    fn test_encode_empty_cart() {
        assert_eq!(encode(&[]).unwrap(), "{}");
    }

    #[test]
    fn test_decode_keeps_stored_order() {
        let lines = vec![
            line("zeta", "Scone", 350, 1),
            line("alpha", "Tea", 500, 3),
            line("mid", "Jam", 199, 2),
        ];
        let decoded = decode(&encode(&lines).unwrap()).unwrap();
        assert_eq!(decoded.lines, lines);
        assert!(decoded.rejected.is_empty());
    }

    #[test]
    fn test_long_prices_survive_round_trip() {
        let mut long = line("p1", "Saffron", 0, 3);
        long.price = Price::new("1234567.891234567891".parse().unwrap()).unwrap();
        let mut tiny = line("p2", "Pinch", 0, 1);
        tiny.price = Price::new("0.000000000000000000000000001".parse().unwrap()).unwrap();

        let blob = encode(&[long.clone(), tiny.clone()]).unwrap();
        assert!(blob.contains("\"price\":1234567.891234567891"));

        let decoded = decode(&blob).unwrap();
        assert_eq!(decoded.lines, [long, tiny]);
    }

    #[test]
    fn test_decode_accepts_records_without_image() {
        let decoded =
            decode(r#"{"p1":{"id":"p1","name":"Tea","price":4.5,"quantity":1}}"#).unwrap();
        assert_eq!(decoded.lines.len(), 1);
        assert_eq!(
            decoded.lines.first().unwrap().price.amount(),
            Decimal::new(45, 1)
        );
    }

    #[test]
    fn test_decode_drops_invalid_records() {
        let blob = json!({
            "good": {"id": "good", "name": "Tea", "price": 5, "quantity": 1},
            "zero": {"id": "zero", "name": "Tea", "price": 5, "quantity": 0},
            "negative": {"id": "negative", "name": "Tea", "price": 5, "quantity": -1},
            "fraction": {"id": "fraction", "name": "Tea", "price": 5, "quantity": 1.5},
            "noid": {"name": "Tea", "price": 5, "quantity": 1},
            "blankid": {"id": "", "name": "Tea", "price": 5, "quantity": 1},
            "strprice": {"id": "strprice", "name": "Tea", "price": "5", "quantity": 1},
            "negprice": {"id": "negprice", "name": "Tea", "price": -5, "quantity": 1},
            "noname": {"id": "noname", "price": 5, "quantity": 1},
            "moved": {"id": "elsewhere", "name": "Tea", "price": 5, "quantity": 1},
            "scalar": 42
        })
        .to_string();

        let decoded = decode(&blob).unwrap();
        assert_eq!(decoded.lines.len(), 1);
        assert_eq!(decoded.lines.first().unwrap().id.as_str(), "good");

        let rejected: Vec<&str> = decoded.rejected.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(
            rejected,
            [
                "zero", "negative", "fraction", "noid", "blankid", "strprice", "negprice",
                "noname", "moved", "scalar"
            ]
        );
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        for blob in ["", "not json", "[]", "null", "\"cart\""] {
            assert!(
                matches!(decode(blob), Err(PersistenceError::Decode(_))),
                "blob {blob:?} should fail to decode"
            );
        }
    }
}
