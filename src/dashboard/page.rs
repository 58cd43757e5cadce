//! Single-page HTML rendering of a [`Dashboard`].
//!
//! The figures are embedded as JSON and drawn by plotly.js on load.

use super::Dashboard;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const CSS: &str = r#"
body { font-family: sans-serif; margin: 0 8px; }
h1 { font-size: 1.6em; margin: 16px 0 8px 20px; }
.region { display: inline-block; vertical-align: top; box-sizing: border-box; }
.region-table { width: 25%; float: left; }
.region-total { width: 25%; }
.region-groups { width: 50%; float: right; }
"#;

pub fn render(dashboard: &Dashboard) -> Result<String, serde_json::Error> {
    // `<` is escaped so category names cannot close the script element.
    let figures = serde_json::to_string(dashboard)?.replace('<', "\\u003c");

    Ok(format!(
        r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Expenses</title>
    <script src="{PLOTLY_JS}" charset="utf-8"></script>
    <style>{CSS}</style>
</head>
<body>
    <div>
        <div class="region region-table">
            <h1>Cost Category</h1>
            <div id="table"></div>
        </div>
        <div class="region region-total">
            <h1>Total</h1>
            <div id="total"></div>
            <div id="bar"></div>
        </div>
        <div class="region region-groups">
            <h1>Groups</h1>
            <div id="sunburst"></div>
        </div>
    </div>
    <script>
const FIGURES = {figures};
const CONFIG = {{ responsive: true, displaylogo: false }};
for (const id of ["table", "total", "bar", "sunburst"]) {{
    Plotly.newPlot(id, FIGURES[id].data, FIGURES[id].layout, CONFIG);
}}
    </script>
</body>
</html>
"##
    ))
}
