//! Price display helpers.

use rust_decimal::Decimal;

/// Format a price for list views.
///
/// When an offer price is set, the offer leads and the original price
/// follows in parentheses, matching the storefront's sale styling:
///
/// ```
/// use rust_decimal::Decimal;
/// use sidra_core::display_price;
///
/// assert_eq!(
///     display_price(Decimal::from(100), Some(Decimal::from(80))),
///     "80$ (100$)"
/// );
/// assert_eq!(display_price(Decimal::from(100), None), "100$");
/// ```
#[must_use]
pub fn display_price(price: Decimal, offer_price: Option<Decimal>) -> String {
    match offer_price {
        Some(offer) => format!("{}$ ({}$)", offer.normalize(), price.normalize()),
        None => format!("{}$", price.normalize()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_price_with_offer() {
        let price = Decimal::from(100);
        let offer = Decimal::from(80);
        assert_eq!(display_price(price, Some(offer)), "80$ (100$)");
    }

    #[test]
    fn test_display_price_without_offer() {
        assert_eq!(display_price(Decimal::from(100), None), "100$");
    }

    #[test]
    fn test_display_price_strips_trailing_zeros() {
        let price = Decimal::new(12550, 2); // 125.50
        assert_eq!(display_price(price, None), "125.5$");
    }
}
