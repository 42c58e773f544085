//! Signal dashboard: a single HTML page backed by a JSON endpoint.
//!
//! `/api/signals` runs a fresh fetch + classify cycle on every request;
//! there is no cache between requests.

use axum::{extract::State, response::Html, routing::get, Json, Router};

use crate::types::PairSignal;
use crate::AppState;

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Vigil Dashboard</title>
    <style>
        body { font-family: 'Segoe UI', Arial, sans-serif; background: #181818; color: #f5f5f5; margin: 0; }
        header { background: #222; padding: 0.5rem; text-align: center; font-size: 1.2rem; color: #ffd700; }
        .container { max-width: 900px; margin: 1rem auto; padding: 1rem; background: #222; border-radius: 8px; }
        h2 { color: #ffd700; font-size: 1rem; margin-bottom: 0.5rem; }
        table { width: 100%; border-collapse: collapse; margin-top: 1rem; font-size: 0.85rem; }
        th, td { padding: 0.3rem 0.4rem; border-bottom: 1px solid #444; text-align: left; }
        th { background: #333; color: #ffd700; font-size: 0.9rem; }
        tr:hover { background: #333; }
        .buy { color: #00ff99; font-weight: bold; }
        .sell { color: #ff4d4d; font-weight: bold; }
        .none { color: #cccccc; }
        .error { color: #ffa500; font-weight: bold; }
    </style>
    <script>
        async function fetchSignals() {
            const res = await fetch('/api/signals');
            const data = await res.json();
            const tbody = document.getElementById('signals-body');
            tbody.innerHTML = '';
            for (const s of data.data) {
                const cls = s.verdict;
                const price = s.price !== undefined ? s.price : 'n/a';
                tbody.innerHTML += `<tr>
                    <td>${s.symbol.toUpperCase()}</td>
                    <td>${s.interval}</td>
                    <td>${price}</td>
                    <td class='${cls}'>${cls.toUpperCase()}</td>
                </tr>`;
            }
        }
        setInterval(fetchSignals, 60000);
        window.onload = fetchSignals;
    </script>
</head>
<body>
    <header>Vigil Dashboard</header>
    <div class="container">
        <h2>Latest Signals</h2>
        <table>
            <thead>
                <tr><th>Symbol</th><th>Interval</th><th>Price</th><th>Signal</th></tr>
            </thead>
            <tbody id="signals-body"></tbody>
        </table>
    </div>
</body>
</html>
"#;

/// API response wrapper.
#[derive(serde::Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// Run a fresh scan over the watchlist and return the rows.
async fn get_signals(State(state): State<AppState>) -> Json<ApiResponse<Vec<PairSignal>>> {
    let signals = state.pipeline.scan().await;
    Json(ApiResponse { data: signals })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/api/signals", get(get_signals))
}
