//! Supported venue/coin route table.
//!
//! Every supported route buys the coin abroad on Kraken against EUR and
//! sells it locally against ZAR. Luno only lists Bitcoin; Ice3x lists all
//! three coins.

use arbsim_core::{Coin, Currency, SimError, Venue};

/// The fixed shape of a supported route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSpec {
    pub coin: Coin,
    pub local_venue: Venue,
    pub local_currency: Currency,
    pub foreign_venue: Venue,
    pub foreign_currency: Currency,
}

/// Look up the route for selling `coin` on `venue`.
pub fn resolve(venue: Venue, coin: Coin) -> Result<RouteSpec, SimError> {
    match (venue, coin) {
        (Venue::Luno, Coin::Bitcoin) | (Venue::Ice3x, _) => Ok(RouteSpec {
            coin,
            local_venue: venue,
            local_currency: Currency::Zar,
            foreign_venue: Venue::Kraken,
            foreign_currency: Currency::Eur,
        }),
        _ => Err(SimError::UnknownRoute {
            venue: venue.name().to_string(),
            coin: coin.name().to_string(),
        }),
    }
}
