//! HTML for the dashboard and the per-state counts page.
//!
//! Pages are rebuilt from scratch on every request. The sidebar radios submit
//! their form on change, so each selection change is a fresh GET.

use crate::figure::Figure;
use crate::filter::{ArmedFilter, Race, Selection};

/// Script URLs the pages load charts and formulas from.
#[derive(Debug, Clone)]
pub struct PageAssets {
    pub plotly_js_url: String,
    pub mathjax_url: String,
}

/// Everything the dashboard page shows for one selection.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub selection: Selection,
    pub feature_columns: &'a [String],
    pub map: &'a Figure,
}

const STYLE: &str = "\
body{margin:0;font-family:'Source Sans Pro',sans-serif;color:#262730;display:flex}\
aside{width:18rem;min-height:100vh;background:#f0f2f6;padding:2rem 1.5rem;box-sizing:border-box}\
main{flex:1;max-width:52rem;padding:2rem 3rem}\
fieldset{border:none;padding:0;margin:0 0 1.5rem}\
legend{font-weight:600;margin-bottom:.5rem}\
label{display:block;margin:.25rem 0}\
table.preview{border-collapse:collapse;margin:.5rem 0 1rem}\
table.preview td,table.preview th{border:1px solid #e6e9ef;padding:.25rem .75rem;text-align:left}\
hr{border:none;border-top:1px solid #e6e9ef;margin:1.5rem 0}";

const USAGE: [&str; 7] = [
    "Each red point: one person shot by police at that city (location is city based).",
    "Color of each state: bias ratio (lighter color -> higher ratio -> higher possibility of racism against R at this state)",
    "Mouse over either the red point or the state to see a box pop up with further information.",
    "Choose the race of people shot you want to observe in the left sidebar (default = white).",
    "If you are interested in the armed type of people shot, choose the armed type in the left sidebar (default = both).",
    "Feel free to zoom in/out, move the map to see what you're curious about. Maybe Hawaii!",
    "Enjoy :)",
];

struct Html {
    buf: String,
}

impl Html {
    fn new() -> Self {
        Self {
            buf: String::with_capacity(64 * 1024),
        }
    }

    fn push<S: AsRef<str>>(&mut self, s: S) {
        self.buf.push_str(s.as_ref());
    }

    fn tag(&mut self, name: &str, text: &str) {
        self.push(format!("<{name}>{}</{name}>", esc(text)));
    }

    fn finish(self) -> String {
        self.buf
    }
}

/// Escape text for element content and double-quoted attributes.
pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Make JSON safe to inline inside a `<script>` element.
pub fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn head(w: &mut Html, title: &str, assets: &PageAssets, with_math: bool) {
    w.push("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    w.push("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    w.tag("title", title);
    w.push(format!("<style>{}</style>", STYLE));
    w.push(format!("<script src=\"{}\"></script>", esc(&assets.plotly_js_url)));
    if with_math {
        w.push(format!(
            "<script id=\"MathJax-script\" async src=\"{}\"></script>",
            esc(&assets.mathjax_url)
        ));
    }
    w.push("</head><body>");
}

fn plot(w: &mut Html, div_id: &str, figure: &Figure) {
    w.push(format!("<div id=\"{}\"></div>", esc(div_id)));
    w.push(format!(
        "<script>(function(){{var fig={};Plotly.newPlot({:?},fig.data,fig.layout,{{responsive:false}});}})();</script>",
        script_json(&figure.to_json()),
        div_id
    ));
}

fn radio_group<T: Copy + PartialEq>(
    w: &mut Html,
    legend: &str,
    name: &str,
    options: &[T],
    current: T,
    label: impl Fn(T) -> &'static str,
) {
    w.push("<fieldset>");
    w.tag("legend", legend);
    for opt in options {
        let value = label(*opt);
        let checked = if *opt == current { " checked" } else { "" };
        w.push(format!(
            "<label><input type=\"radio\" name=\"{}\" value=\"{}\" onchange=\"this.form.submit()\"{}> {}</label>",
            esc(name),
            esc(value),
            checked,
            esc(value)
        ));
    }
    w.push("</fieldset>");
}

fn sidebar(w: &mut Html, selection: Selection) {
    w.push("<aside><form method=\"get\" action=\"/\">");
    w.tag("h2", "What shooting data you want to observe?");
    radio_group(w, "Select race", "race", &Race::ALL, selection.race, |r| r.label());
    radio_group(
        w,
        "Select armed type",
        "armed",
        &ArmedFilter::ALL,
        selection.armed,
        |a| a.label(),
    );
    w.push("<noscript><button type=\"submit\">Apply</button></noscript>");
    w.push("</form>");
    w.tag("h2", "Notes for bias ratio");
    w.tag(
        "p",
        "lighter color -> higher bias ratio -> higher possibility of racism against selected race at this state",
    );
    w.push("</aside>");
}

fn introduction(w: &mut Html, feature_columns: &[String]) {
    w.tag("h3", "Introduction");
    w.tag(
        "p",
        "Our visualization is built on the US police shooting data from January 2015 to June 2020. ",
    );
    w.tag("p", "Overview of data features:");
    w.push("<table class=\"preview\"><thead><tr><th></th><th>0</th></tr></thead><tbody>");
    for (i, col) in feature_columns.iter().enumerate() {
        w.push(format!("<tr><th>{}</th><td>{}</td></tr>", i, esc(col)));
    }
    w.push("</tbody></table>");
    w.push(
        "<p>Data resource: <a href=\"https://www.kaggle.com/ahsen1330/us-police-shootings\">\
         https://www.kaggle.com/ahsen1330/us-police-shootings</a></p>",
    );
    w.tag(
        "p",
        "A naive approach to visualize such data is a barplot or pieplot to show the count or \
         percentage of people shot by police in each state, grouped by people’s races. Such a \
         design is not sufficient enough since we didn’t consider the fact that the race \
         population in each state can be very different. ",
    );
    w.tag(
        "p",
        "Take an extreme example here: for people shot by police in Pennsylvania, 70% of them \
         are white people and 30% of them are black people. If we only see such a percentage, \
         we may think there is no bias or racism against black people at all. However, assume \
         extremely that 95% of the population in Pennsylvania are white and only 5% of the \
         population are black. Then obviously a racism problem will be raised. ",
    );
    w.tag(
        "p",
        "Therefore, we introduced a new measurement in our visualization: Bias ratio.",
    );
}

fn formula(w: &mut Html) {
    w.tag("h3", "Bias ratio");
    w.push(
        "<p>$$ \\text{bias ratio of race R at state S} = \
         \\frac{\\text{shooting percentage of people of race R at state S}}\
         {\\text{population percentage of people of race R at state S}} $$</p>",
    );
    w.tag(
        "p",
        "NOTE: higher ratio has lighter color in the graph, and can roughly represent a higher \
         possibility of racism against race R at state S.",
    );
}

pub fn render_dashboard(view: &DashboardView<'_>, assets: &PageAssets) -> String {
    let mut w = Html::new();
    head(&mut w, "Police Shooting", assets, true);
    sidebar(&mut w, view.selection);

    w.push("<main>");
    w.tag("h1", "Data Visualization of US Police Shooting");
    w.tag("h2", "Does US Police Shooting reflect racism?");
    w.tag(
        "p",
        "Made by Vanessa Yin (yuey4@andrew.cmu.edu) for 05839-Fall21 Assignment2",
    );
    w.push("<hr>");
    introduction(&mut w, view.feature_columns);
    formula(&mut w);

    w.tag("h3", "Visualization");
    w.tag("p", "How to use this graph?");
    w.push("<ul>");
    for item in USAGE {
        w.tag("li", item);
    }
    w.push("</ul>");
    plot(&mut w, "bias-map", view.map);
    w.push("<p><a href=\"/counts\">Incident counts per state by race</a></p>");
    w.push("</main></body></html>");
    w.finish()
}

pub fn render_counts(figure: &Figure, assets: &PageAssets) -> String {
    let mut w = Html::new();
    head(&mut w, "Police Shooting: counts per state", assets, false);
    w.push("<main>");
    w.tag("h1", "People shot by police per state, by race");
    w.tag(
        "p",
        "Raw counts do not account for how the race population differs between states; \
         see the bias ratio map for that.",
    );
    plot(&mut w, "state-counts", figure);
    w.push("<p><a href=\"/\">Back to the bias ratio map</a></p>");
    w.push("</main></body></html>");
    w.finish()
}
