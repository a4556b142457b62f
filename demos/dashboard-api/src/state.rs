/// Shared application state, handed to every route through Axum's `State`
/// extractor.
pub struct AppState {
    /// Runs the blocking SDK operations on Tokio's blocking pool.
    pub sdk: congress_trades_sdk::AsyncTradesSdk,
}
