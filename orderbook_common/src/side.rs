//! Book side tag shared between client and server.

use strum_macros::Display;

/// Which half of the book a query targets.
#[derive(Debug, Clone, Copy, Display, Hash, Eq, PartialEq)]
pub enum Side {
    /// Buy side, best is highest price.
    #[strum(to_string = "bids")]
    Bid,
    /// Sell side, best is lowest price.
    #[strum(to_string = "asks")]
    Ask,
}

impl Side {
    /// Both sides in response order.
    pub const ALL: [Side; 2] = [Side::Bid, Side::Ask];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_plural_names() {
        assert_eq!(Side::Bid.to_string(), "bids");
        assert_eq!(Side::Ask.to_string(), "asks");
        assert_eq!(Side::ALL.map(|s| s.to_string()), ["bids", "asks"]);
    }
}
