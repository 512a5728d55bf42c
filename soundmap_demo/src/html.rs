// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-page HTML report wrapping the demo SVGs.

use core::fmt::Write as _;

/// One titled figure of the report.
#[derive(Debug)]
pub(crate) struct HtmlSection {
    pub(crate) title: &'static str,
    pub(crate) description: String,
    pub(crate) svg: String,
}

pub(crate) fn render_report(title: &str, sections: &[HtmlSection]) -> String {
    let mut out = String::new();
    out.push_str("<!doctype html>\n<html><head><meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{title}</title>");
    out.push_str(
        "<style>body{font-family:sans-serif;margin:2em;}section{margin-bottom:2em;}\
         svg{border:1px solid #ccc;}</style>\n",
    );
    out.push_str("</head><body>\n");
    let _ = writeln!(out, "<h1>{title}</h1>");
    for section in sections {
        out.push_str("<section>\n");
        let _ = writeln!(out, "<h2>{}</h2>", section.title);
        let _ = writeln!(out, "<p>{}</p>", section.description);
        out.push_str(&section.svg);
        out.push_str("</section>\n");
    }
    out.push_str("</body></html>\n");
    out
}
