// Static dashboard pages. Each page renders client-side from the JSON API.

use axum::response::Html;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; background: #f6f7f9; color: #222; }
nav { background: #b22222; padding: 12px 24px; }
nav a { color: #fff; margin-right: 18px; text-decoration: none; font-weight: bold; }
main { max-width: 1100px; margin: 24px auto; padding: 0 16px; }
table { border-collapse: collapse; width: 100%; background: #fff; }
th, td { border-bottom: 1px solid #ddd; padding: 8px; text-align: left; }
img.chart { max-width: 100%; background: #fff; margin: 16px 0; }
.error { color: #b22222; }
"#;

/// Fields rendered with two decimals; counts, ranks and votes stay integral
const FRACTIONAL_COLUMNS: [&str; 3] = ["rating", "avg_rating", "percentage"];

const SCRIPT: &str = r#"
async function api(path) {
  const res = await fetch(path);
  const body = await res.json();
  if (!res.ok || !body.success) {
    throw new Error(body && body.error ? body.error : `Request failed (${res.status})`);
  }
  return body.data;
}
function fmt(value, column) {
  if (value == null) return 'N/A';
  return FRACTIONAL_COLUMNS.includes(column) ? Number(value).toFixed(2) : value;
}
function fillTable(id, rows, columns) {
  const table = document.getElementById(id);
  table.innerHTML = '<tr>' + columns.map(c => `<th>${c}</th>`).join('') + '</tr>' +
    rows.map(r => '<tr>' + columns.map(c => `<td>${fmt(Array.isArray(r[c]) ? r[c].join(', ') : r[c], c)}</td>`).join('') + '</tr>').join('');
}
async function showChart(id, kind) {
  try {
    const chart = await api(`/api/charts/${kind}`);
    document.getElementById(id).src = `data:image/png;base64,${chart.base64_image}`;
  } catch (err) { showError(err); }
}
function showError(err) {
  document.getElementById('error').textContent = err instanceof Error ? err.message : String(err);
}
"#;

fn fractional_columns_js() -> String {
    let quoted: Vec<String> = FRACTIONAL_COLUMNS.iter().map(|c| format!("'{}'", c)).collect();
    format!("[{}]", quoted.join(", "))
}

fn layout(title: &str, body: &str, script: &str) -> Html<String> {
    let fractional = fractional_columns_js();
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Restaurant Insights</title>
<style>{STYLE}</style>
</head>
<body>
<nav>
<a href="/">Home</a>
<a href="/top-restaurants">Top Restaurants</a>
<a href="/top-foodie-areas">Foodie Areas</a>
<a href="/top-restaurant-types">Restaurant Types</a>
</nav>
<main>
<h1>{title}</h1>
<p id="error" class="error"></p>
{body}
</main>
<script>const FRACTIONAL_COLUMNS = {fractional};
{SCRIPT}
{script}</script>
</body>
</html>"#
    ))
}

pub async fn index_page() -> Html<String> {
    layout(
        "Restaurant Insights",
        r#"<form id="search-form">
<input id="search-query" maxlength="200" placeholder="Search restaurants">
<select id="search-mode">
<option value="name">Name</option>
<option value="type">Type</option>
<option value="area">Area</option>
</select>
<button type="submit">Search</button>
</form>
<h2 id="search-title"></h2>
<table id="search-results"></table>
<img id="types-chart" class="chart" alt="Restaurant types">"#,
        r#"
const columns = { name: ['name', 'location', 'restaurant_type', 'rating', 'votes'],
                  type: ['restaurant_type', 'count', 'avg_rating'],
                  area: ['area', 'restaurant_count', 'avg_rating'] };
document.getElementById('search-form').addEventListener('submit', async (e) => {
  e.preventDefault();
  const q = document.getElementById('search-query').value.trim();
  const mode = document.getElementById('search-mode').value;
  if (!q) return;
  try {
    const data = await api(`/api/search?q=${encodeURIComponent(q)}&mode=${mode}`);
    document.getElementById('search-title').textContent = `${data.total_matches} match(es)`;
    fillTable('search-results', data.results, columns[data.mode]);
  } catch (err) { showError(err); }
});
showChart('types-chart', 'restaurant-types-pie');"#,
    )
}

pub async fn top_restaurants_page() -> Html<String> {
    layout(
        "Top Restaurants",
        r#"<select id="sort-by"><option value="votes">By votes</option><option value="rating">By rating</option></select>
<img id="chart" class="chart" alt="Top restaurants">
<table id="rows"></table>"#,
        r#"
async function load() {
  try {
    const sortBy = document.getElementById('sort-by').value;
    const data = await api(`/api/top-restaurants?limit=10&sort_by=${sortBy}`);
    fillTable('rows', data.top_restaurants, ['rank', 'name', 'location', 'rating', 'votes', 'restaurant_type', 'cuisines']);
  } catch (err) { showError(err); }
}
document.getElementById('sort-by').addEventListener('change', load);
load();
showChart('chart', 'top-restaurants-bar');"#,
    )
}

pub async fn foodie_areas_page() -> Html<String> {
    layout(
        "Top Foodie Areas",
        r#"<img id="chart" class="chart" alt="Foodie areas">
<table id="rows"></table>"#,
        r#"
api('/api/foodie-areas?limit=20')
  .then(data => fillTable('rows', data.foodie_areas, ['area', 'restaurant_count', 'avg_rating', 'top_cuisines', 'restaurant_types']))
  .catch(showError);
showChart('chart', 'foodie-areas-bar');"#,
    )
}

pub async fn restaurant_types_page() -> Html<String> {
    layout(
        "Restaurant Types",
        r#"<img id="chart" class="chart" alt="Restaurant types">
<table id="rows"></table>"#,
        r#"
api('/api/restaurant-types')
  .then(data => fillTable('rows', data.restaurant_types, ['restaurant_type', 'count', 'percentage', 'avg_rating', 'avg_cost_for_two']))
  .catch(showError);
showChart('chart', 'restaurant-types-pie');"#,
    )
}
