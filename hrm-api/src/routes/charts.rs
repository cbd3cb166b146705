//! Public HTML charts page.
//!
//! The chart series are embedded as JSON in a
//! `<script type="application/json" id="chart-data">` element and drawn onto
//! two canvases by a small inline script.

use axum::{extract::State, response::Html};
use hrm_core::ChartData;

use crate::{db::DbClient, error::ApiResult};

const PAGE_HEAD: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>HRM Charts</title>
<style>
body { font-family: system-ui, sans-serif; margin: 2rem; color: #222; }
section { margin-bottom: 2.5rem; }
canvas { border: 1px solid #ddd; }
</style>
</head>
<body>
<h1>HRM Charts</h1>
<section>
<h2>Headcount by department</h2>
<canvas id="dept-chart" width="720" height="320"></canvas>
</section>
<section>
<h2>Top rated employees</h2>
<canvas id="rating-chart" width="720" height="320"></canvas>
</section>
<script type="application/json" id="chart-data">"##;

const PAGE_TAIL: &str = r##"</script>
<script>
(function () {
  var data = JSON.parse(document.getElementById("chart-data").textContent);
  function bars(id, labels, values, max) {
    var canvas = document.getElementById(id);
    var ctx = canvas.getContext("2d");
    var pad = 40, w = canvas.width - pad * 2, h = canvas.height - pad * 2;
    var top = max || Math.max.apply(null, values.concat([1]));
    var step = labels.length ? w / labels.length : w;
    ctx.font = "12px sans-serif";
    ctx.textAlign = "center";
    labels.forEach(function (label, i) {
      var bh = (values[i] / top) * h;
      ctx.fillStyle = "#4a7bd0";
      ctx.fillRect(pad + i * step + step * 0.15, pad + h - bh, step * 0.7, bh);
      ctx.fillStyle = "#222";
      ctx.fillText(String(values[i]), pad + i * step + step / 2, pad + h - bh - 4);
      ctx.fillText(label, pad + i * step + step / 2, pad + h + 16);
    });
  }
  bars("dept-chart", data.dept_labels, data.dept_counts);
  bars("rating-chart", data.emp_labels, data.emp_ratings, 5);
})();
</script>
</body>
</html>
"##;

/// GET /charts
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/charts",
    tag = "Reports",
    responses((status = 200, description = "HTML charts page", content_type = "text/html", body = String)),
))]
pub async fn charts_page(State(db): State<DbClient>) -> ApiResult<Html<String>> {
    let data = db.chart_data().await?;
    Ok(Html(render_page(&data)?))
}

pub fn render_page(data: &ChartData) -> ApiResult<String> {
    let json = embed_json(data)?;
    let mut page = String::with_capacity(PAGE_HEAD.len() + json.len() + PAGE_TAIL.len());
    page.push_str(PAGE_HEAD);
    page.push_str(&json);
    page.push_str(PAGE_TAIL);
    Ok(page)
}

/// JSON safe to place inside a `<script>` element.
pub fn embed_json(data: &ChartData) -> ApiResult<String> {
    let json = serde_json::to_string(data)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}
