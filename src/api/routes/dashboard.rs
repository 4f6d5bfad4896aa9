//! Dashboard Page
//!
//! - GET / - Static page hosting the country dropdown, the year range
//!   inputs and the chart
//!
//! The page itself holds no data. On load it reads `/api/v1/options` to
//! fill the widgets, then posts the selection to `/api/v1/chart` on every
//! change and hands the returned description to Plotly.

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::config::DashboardConfig;

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{title}}</title>
  <link rel="stylesheet" href="{{stylesheet}}">
  <script src="{{plotly}}"></script>
</head>
<body>
  <h1>{{title}}</h1>
  <div>{{description}}</div>
  <div class="row">
    <div class="six columns">
      <select id="country" multiple size="8" style="width: 100%"></select>
    </div>
    <div class="six columns">
      <label for="start">From <span id="start-label"></span></label>
      <input id="start" type="range" list="marks" style="width: 100%">
      <label for="end">To <span id="end-label"></span></label>
      <input id="end" type="range" list="marks" style="width: 100%">
      <datalist id="marks"></datalist>
    </div>
  </div>
  <p id="status" role="alert"></p>
  <div id="graph"></div>
  <script>
    const api = '/api/v1';
    const country = document.getElementById('country');
    const start = document.getElementById('start');
    const end = document.getElementById('end');
    const statusLine = document.getElementById('status');
    // Only the newest chart request may draw
    let seq = 0;

    async function fail(res) {
      let message = res.statusText;
      try {
        message = (await res.json()).error.message;
      } catch (_) {}
      statusLine.textContent = 'Request failed (' + res.status + '): ' + message;
    }

    async function init() {
      const optsRes = await fetch(api + '/options');
      if (!optsRes.ok) {
        await fail(optsRes);
        return;
      }
      const opts = await optsRes.json();
      for (const name of opts.countries) {
        const selected = opts.default_countries.includes(name);
        country.add(new Option(name, name, selected, selected));
      }
      for (const input of [start, end]) {
        input.min = opts.year_min;
        input.max = opts.year_max;
        input.step = opts.step;
      }
      const [lo, hi] = opts.default_range || [0, 0];
      start.value = lo;
      end.value = hi;
      const marks = document.getElementById('marks');
      for (const [year, label] of Object.entries(opts.marks)) {
        const mark = document.createElement('option');
        mark.value = year;
        mark.label = label;
        marks.appendChild(mark);
      }
      for (const el of [country, start, end]) {
        el.addEventListener('input', update);
      }
      await update();
    }

    async function update() {
      const mine = ++seq;
      let lo = Number(start.value);
      let hi = Number(end.value);
      if (lo > hi) [lo, hi] = [hi, lo];
      document.getElementById('start-label').textContent = lo;
      document.getElementById('end-label').textContent = hi;

      const countries = Array.from(country.selectedOptions, o => o.value);
      const res = await fetch(api + '/chart', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ countries, year_range: [lo, hi] }),
      });
      if (mine !== seq) return;
      if (!res.ok) {
        await fail(res);
        return;
      }
      const chart = await res.json();
      if (mine !== seq) return;
      statusLine.textContent = '';

      const traces = chart.series.map(s => ({
        x: s.points.map(p => p.year),
        y: s.points.map(p => p.value),
        name: s.name,
        mode: 'lines',
        line: { color: s.color },
      }));
      Plotly.react('graph', traces, {
        title: { text: chart.title },
        xaxis: { title: { text: chart.x_axis_label } },
        yaxis: { title: { text: chart.y_axis_label } },
        height: chart.height,
      });
    }

    init();
  </script>
</body>
</html>
"#;

/// GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_page(&state.dashboard))
}

/// Fill the page template from the layout configuration
pub fn render_page(config: &DashboardConfig) -> String {
    PAGE_TEMPLATE
        .replace("{{title}}", &escape_html(&config.title))
        .replace("{{description}}", &escape_html(&config.description))
        .replace("{{stylesheet}}", &escape_html(&config.stylesheet))
        .replace("{{plotly}}", PLOTLY_SRC)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
