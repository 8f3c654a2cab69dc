//! Flat-fare ticketing.
//!
//! A ticket is valid for a fixed window of travel time, so a journey needs
//! one ticket per started window. There are no fare zones.

use serde::Serialize;

/// Price and validity of a single ticket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TicketPolicy {
    /// Price of one ticket (RON).
    pub price_per_ticket: f64,

    /// Minutes a ticket stays valid after validation.
    pub validity_mins: u32,
}

impl Default for TicketPolicy {
    fn default() -> Self {
        Self {
            price_per_ticket: 3.5,
            validity_mins: 45,
        }
    }
}

/// Tickets and total cost for one journey.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TicketQuote {
    pub tickets: u32,
    pub cost: f64,
}

impl TicketPolicy {
    pub fn new(price_per_ticket: f64, validity_mins: u32) -> Self {
        Self {
            price_per_ticket,
            validity_mins,
        }
    }

    /// Tickets needed for a journey of `minutes`.
    ///
    /// Always at least one, even for zero or negative durations.
    pub fn tickets_for(&self, minutes: i64) -> u32 {
        if minutes <= 0 || self.validity_mins == 0 {
            return 1;
        }
        let window = i64::from(self.validity_mins);
        let tickets = (minutes + window - 1) / window;
        u32::try_from(tickets).unwrap_or(u32::MAX).max(1)
    }

    pub fn quote(&self, minutes: i64) -> TicketQuote {
        let tickets = self.tickets_for(minutes);
        TicketQuote {
            tickets,
            cost: f64::from(tickets) * self.price_per_ticket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy() {
        let policy = TicketPolicy::default();
        assert_eq!(policy.price_per_ticket, 3.5);
        assert_eq!(policy.validity_mins, 45);
    }

    #[test]
    fn one_window_is_one_ticket() {
        let policy = TicketPolicy::default();
        assert_eq!(policy.tickets_for(1), 1);
        assert_eq!(policy.tickets_for(45), 1);
    }

    #[test]
    fn started_window_needs_another_ticket() {
        let policy = TicketPolicy::default();
        assert_eq!(policy.tickets_for(46), 2);
        assert_eq!(policy.tickets_for(90), 2);
        assert_eq!(policy.tickets_for(91), 3);
    }

    #[test]
    fn non_positive_duration_is_one_ticket() {
        let policy = TicketPolicy::default();
        assert_eq!(policy.tickets_for(0), 1);
        assert_eq!(policy.tickets_for(-30), 1);
    }

    #[test]
    fn quote_prices_tickets() {
        let quote = TicketPolicy::default().quote(60);
        assert_eq!(quote.tickets, 2);
        assert_eq!(quote.cost, 7.0);
    }

    #[test]
    fn custom_policy() {
        let policy = TicketPolicy::new(4.0, 60);
        assert_eq!(policy.quote(61), TicketQuote { tickets: 2, cost: 8.0 });
    }
}
