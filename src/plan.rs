// Pure helpers for the interactive flow: quantity validation, page
// arithmetic and the count -> quantity -> pages decision.

use crate::download::Tally;
use crate::error::{Error, Result};

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// Downloads ran; some items may have failed.
    Done(Tally),
    /// The search returned nothing.
    NoResults,
    /// The requested quantity was zero or above the available total.
    InvalidQuantity,
    /// The user declined to continue after seeing the total.
    Cancelled,
}

impl Finish {
    /// Early aborts map to a failing exit status.
    pub fn is_abort(self) -> bool {
        matches!(self, Finish::NoResults | Finish::InvalidQuantity)
    }
}

/// Accept `requested` only if it is positive and no larger than what the
/// search reported.
pub fn validate_quantity(requested: u64, available: u64) -> Result<u64> {
    if requested == 0 || requested > available {
        return Err(Error::Validation(format!(
            "Not a valid number: {requested} (choose between 1 and {available})"
        )));
    }
    Ok(requested)
}

/// Pages needed to cover `quantity` results at `page_size` per page.
pub fn page_count(quantity: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = quantity / page_size + u64::from(quantity % page_size != 0);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Stop early when the search found nothing.
pub fn check_total(total: u64) -> std::result::Result<u64, Finish> {
    if total == 0 {
        return Err(Finish::NoResults);
    }
    Ok(total)
}

/// Number of pages to fetch for `requested` images out of `total`, or the
/// early finish the flow must stop with.
pub fn decide(total: u64, requested: u64, page_size: u32) -> std::result::Result<u32, Finish> {
    let total = check_total(total)?;
    let quantity = validate_quantity(requested, total).map_err(|_| Finish::InvalidQuantity)?;
    Ok(page_count(quantity, page_size))
}
