/// Custom actions for Product entities.
///
/// Actions run inside the product actor, so each one is atomic.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Checks the current stock level without modifying it.
    CheckStock,
    /// Reserves a specified amount of stock if that much is available.
    ReserveStock(u32),
    /// Adds stock back, e.g. after a delivery from the workshop.
    Restock(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone)]
pub enum ProductActionResult {
    CheckStock(u32),
    ReserveStock(StockReservation),
    /// New stock level
    Restock(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StockReservation {
    Reserved { remaining: u32 },
    Insufficient { requested: u32, available: u32 },
}
