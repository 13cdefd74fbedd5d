use crate::config::HEAD_TO_HEAD;
use crate::error::{AppError, Result};
use crate::types::{describe, RawFixture};

/// Index of the first head to head label, compared case-insensitively.
pub fn head_to_head_index(labels: &[String]) -> Option<usize> {
    labels
        .iter()
        .position(|label| label.trim().eq_ignore_ascii_case(HEAD_TO_HEAD))
}

/// Selected market label with its `(home, away)` prices.
///
/// Prices are laid out two per market in label order, so market `j` owns
/// positions `2j` and `2j + 1`.
pub fn select_head_to_head(raw: &RawFixture) -> Result<(String, f64, f64)> {
    let fixture = describe(&raw.home, &raw.away);

    let j = head_to_head_index(&raw.market_labels).ok_or_else(|| AppError::MarketNotFound {
        fixture: fixture.clone(),
        labels: raw.market_labels.clone(),
    })?;

    let (Some(home), Some(away)) = (raw.price_texts.get(2 * j), raw.price_texts.get(2 * j + 1))
    else {
        return Err(AppError::MissingPrices {
            fixture,
            market_index: j,
            found: raw.price_texts.len(),
        });
    };

    Ok((raw.market_labels[j].clone(), parse_price(home)?, parse_price(away)?))
}

/// Decimal odds text to a number.
pub fn parse_price(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| AppError::PriceParse {
            text: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(labels: &[&str], prices: &[&str]) -> RawFixture {
        RawFixture {
            time_text: "Friday, 12 May 19:30".to_string(),
            market_labels: labels.iter().map(|s| s.to_string()).collect(),
            price_texts: prices.iter().map(|s| s.to_string()).collect(),
            home: "Richmond".to_string(),
            away: "Essendon".to_string(),
        }
    }

    #[test]
    fn head_to_head_first_position() {
        let (label, home, away) =
            select_head_to_head(&raw(&["Head To Head", "Line"], &["1.50", "2.60", "1.90", "1.90"]))
                .unwrap();
        assert_eq!(label, "Head To Head");
        assert_eq!(home, 1.50);
        assert_eq!(away, 2.60);
    }

    #[test]
    fn head_to_head_second_position() {
        let (_, home, away) = select_head_to_head(&raw(
            &["Line", "HEAD TO HEAD"],
            &["1.90", "1.90", "3.10", "1.36"],
        ))
        .unwrap();
        assert_eq!((home, away), (3.10, 1.36));
    }

    #[test]
    fn first_matching_label_wins() {
        let (_, home, away) = select_head_to_head(&raw(
            &["head to head", "Head To Head"],
            &["1.10", "6.50", "9.99", "9.99"],
        ))
        .unwrap();
        assert_eq!((home, away), (1.10, 6.50));
    }

    #[test]
    fn missing_market_is_reported() {
        let err = select_head_to_head(&raw(&["Line", "Total"], &["1.90", "1.90", "1.85", "1.95"]))
            .unwrap_err();
        match err {
            AppError::MarketNotFound { fixture, labels } => {
                assert_eq!(fixture, "Richmond v Essendon");
                assert_eq!(labels, vec!["Line", "Total"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_price_list_is_reported() {
        let err = select_head_to_head(&raw(&["Line", "Head To Head"], &["1.90", "1.90", "2.00"]))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingPrices {
                market_index: 1,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn price_text_must_be_numeric() {
        assert_eq!(parse_price(" 2.05 ").unwrap(), 2.05);
        assert!(matches!(parse_price("SUS"), Err(AppError::PriceParse { .. })));
        assert!(parse_price("NaN").is_err());
        assert!(parse_price("inf").is_err());
    }
}
