//! Built-in interpreter for common utility class names.
//!
//! Used only when a token has no rule in the build's compiled stylesheets.
//! Keyword tables map whole tokens to fixed declarations; parametric
//! families (`p-4`, `w-1/2`, `-mt-2`, `gap-x-[3px]`) resolve through the
//! 0.25rem spacing scale or a bracketed arbitrary value. Variant-prefixed
//! tokens (`hover:`, `md:`) are never interpreted: their scope is only
//! known from the compiled stylesheet.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::Declaration;

type Table = &'static [(&'static str, &'static [(&'static str, &'static str)])];

const KEYWORDS: Table = &[
    // display
    ("block", &[("display", "block")]),
    ("inline-block", &[("display", "inline-block")]),
    ("inline", &[("display", "inline")]),
    ("flex", &[("display", "flex")]),
    ("inline-flex", &[("display", "inline-flex")]),
    ("grid", &[("display", "grid")]),
    ("inline-grid", &[("display", "inline-grid")]),
    ("table", &[("display", "table")]),
    ("table-row", &[("display", "table-row")]),
    ("table-cell", &[("display", "table-cell")]),
    ("contents", &[("display", "contents")]),
    ("flow-root", &[("display", "flow-root")]),
    ("list-item", &[("display", "list-item")]),
    ("hidden", &[("display", "none")]),
    // position & visibility
    ("static", &[("position", "static")]),
    ("fixed", &[("position", "fixed")]),
    ("absolute", &[("position", "absolute")]),
    ("relative", &[("position", "relative")]),
    ("sticky", &[("position", "sticky")]),
    ("visible", &[("visibility", "visible")]),
    ("invisible", &[("visibility", "hidden")]),
    ("collapse", &[("visibility", "collapse")]),
    ("isolate", &[("isolation", "isolate")]),
    // flexbox
    ("flex-row", &[("flex-direction", "row")]),
    ("flex-row-reverse", &[("flex-direction", "row-reverse")]),
    ("flex-col", &[("flex-direction", "column")]),
    ("flex-col-reverse", &[("flex-direction", "column-reverse")]),
    ("flex-wrap", &[("flex-wrap", "wrap")]),
    ("flex-wrap-reverse", &[("flex-wrap", "wrap-reverse")]),
    ("flex-nowrap", &[("flex-wrap", "nowrap")]),
    ("flex-1", &[("flex", "1 1 0%")]),
    ("flex-auto", &[("flex", "1 1 auto")]),
    ("flex-initial", &[("flex", "0 1 auto")]),
    ("flex-none", &[("flex", "none")]),
    ("grow", &[("flex-grow", "1")]),
    ("grow-0", &[("flex-grow", "0")]),
    ("shrink", &[("flex-shrink", "1")]),
    ("shrink-0", &[("flex-shrink", "0")]),
    ("items-start", &[("align-items", "flex-start")]),
    ("items-end", &[("align-items", "flex-end")]),
    ("items-center", &[("align-items", "center")]),
    ("items-baseline", &[("align-items", "baseline")]),
    ("items-stretch", &[("align-items", "stretch")]),
    ("justify-start", &[("justify-content", "flex-start")]),
    ("justify-end", &[("justify-content", "flex-end")]),
    ("justify-center", &[("justify-content", "center")]),
    ("justify-between", &[("justify-content", "space-between")]),
    ("justify-around", &[("justify-content", "space-around")]),
    ("justify-evenly", &[("justify-content", "space-evenly")]),
    ("justify-stretch", &[("justify-content", "stretch")]),
    ("self-auto", &[("align-self", "auto")]),
    ("self-start", &[("align-self", "flex-start")]),
    ("self-end", &[("align-self", "flex-end")]),
    ("self-center", &[("align-self", "center")]),
    ("self-stretch", &[("align-self", "stretch")]),
    ("self-baseline", &[("align-self", "baseline")]),
    ("content-start", &[("align-content", "flex-start")]),
    ("content-end", &[("align-content", "flex-end")]),
    ("content-center", &[("align-content", "center")]),
    ("content-between", &[("align-content", "space-between")]),
    ("content-around", &[("align-content", "space-around")]),
    ("content-evenly", &[("align-content", "space-evenly")]),
    // text
    ("text-left", &[("text-align", "left")]),
    ("text-center", &[("text-align", "center")]),
    ("text-right", &[("text-align", "right")]),
    ("text-justify", &[("text-align", "justify")]),
    ("text-start", &[("text-align", "start")]),
    ("text-end", &[("text-align", "end")]),
    ("text-xs", &[("font-size", "0.75rem"), ("line-height", "1rem")]),
    ("text-sm", &[("font-size", "0.875rem"), ("line-height", "1.25rem")]),
    ("text-base", &[("font-size", "1rem"), ("line-height", "1.5rem")]),
    ("text-lg", &[("font-size", "1.125rem"), ("line-height", "1.75rem")]),
    ("text-xl", &[("font-size", "1.25rem"), ("line-height", "1.75rem")]),
    ("text-2xl", &[("font-size", "1.5rem"), ("line-height", "2rem")]),
    ("text-3xl", &[("font-size", "1.875rem"), ("line-height", "2.25rem")]),
    ("text-4xl", &[("font-size", "2.25rem"), ("line-height", "2.5rem")]),
    ("font-thin", &[("font-weight", "100")]),
    ("font-extralight", &[("font-weight", "200")]),
    ("font-light", &[("font-weight", "300")]),
    ("font-normal", &[("font-weight", "400")]),
    ("font-medium", &[("font-weight", "500")]),
    ("font-semibold", &[("font-weight", "600")]),
    ("font-bold", &[("font-weight", "700")]),
    ("font-extrabold", &[("font-weight", "800")]),
    ("font-black", &[("font-weight", "900")]),
    ("italic", &[("font-style", "italic")]),
    ("not-italic", &[("font-style", "normal")]),
    ("uppercase", &[("text-transform", "uppercase")]),
    ("lowercase", &[("text-transform", "lowercase")]),
    ("capitalize", &[("text-transform", "capitalize")]),
    ("normal-case", &[("text-transform", "none")]),
    ("underline", &[("text-decoration-line", "underline")]),
    ("line-through", &[("text-decoration-line", "line-through")]),
    ("no-underline", &[("text-decoration-line", "none")]),
    (
        "truncate",
        &[
            ("overflow", "hidden"),
            ("text-overflow", "ellipsis"),
            ("white-space", "nowrap"),
        ],
    ),
    ("whitespace-normal", &[("white-space", "normal")]),
    ("whitespace-nowrap", &[("white-space", "nowrap")]),
    ("whitespace-pre", &[("white-space", "pre")]),
    ("whitespace-pre-wrap", &[("white-space", "pre-wrap")]),
    ("break-words", &[("overflow-wrap", "break-word")]),
    ("break-all", &[("word-break", "break-all")]),
    ("leading-none", &[("line-height", "1")]),
    ("leading-tight", &[("line-height", "1.25")]),
    ("leading-snug", &[("line-height", "1.375")]),
    ("leading-normal", &[("line-height", "1.5")]),
    ("leading-relaxed", &[("line-height", "1.625")]),
    ("leading-loose", &[("line-height", "2")]),
    ("tracking-tight", &[("letter-spacing", "-0.025em")]),
    ("tracking-normal", &[("letter-spacing", "0em")]),
    ("tracking-wide", &[("letter-spacing", "0.025em")]),
    // colors
    ("text-white", &[("color", "#fff")]),
    ("text-black", &[("color", "#000")]),
    ("text-transparent", &[("color", "transparent")]),
    ("text-current", &[("color", "currentColor")]),
    ("text-inherit", &[("color", "inherit")]),
    ("bg-white", &[("background-color", "#fff")]),
    ("bg-black", &[("background-color", "#000")]),
    ("bg-transparent", &[("background-color", "transparent")]),
    ("bg-current", &[("background-color", "currentColor")]),
    ("border-white", &[("border-color", "#fff")]),
    ("border-black", &[("border-color", "#000")]),
    ("border-transparent", &[("border-color", "transparent")]),
    // overflow
    ("overflow-auto", &[("overflow", "auto")]),
    ("overflow-hidden", &[("overflow", "hidden")]),
    ("overflow-clip", &[("overflow", "clip")]),
    ("overflow-visible", &[("overflow", "visible")]),
    ("overflow-scroll", &[("overflow", "scroll")]),
    ("overflow-x-auto", &[("overflow-x", "auto")]),
    ("overflow-x-hidden", &[("overflow-x", "hidden")]),
    ("overflow-x-scroll", &[("overflow-x", "scroll")]),
    ("overflow-y-auto", &[("overflow-y", "auto")]),
    ("overflow-y-hidden", &[("overflow-y", "hidden")]),
    ("overflow-y-scroll", &[("overflow-y", "scroll")]),
    // interactivity
    ("cursor-auto", &[("cursor", "auto")]),
    ("cursor-default", &[("cursor", "default")]),
    ("cursor-pointer", &[("cursor", "pointer")]),
    ("cursor-wait", &[("cursor", "wait")]),
    ("cursor-text", &[("cursor", "text")]),
    ("cursor-move", &[("cursor", "move")]),
    ("cursor-not-allowed", &[("cursor", "not-allowed")]),
    ("cursor-grab", &[("cursor", "grab")]),
    ("pointer-events-none", &[("pointer-events", "none")]),
    ("pointer-events-auto", &[("pointer-events", "auto")]),
    ("select-none", &[("user-select", "none")]),
    ("select-text", &[("user-select", "text")]),
    ("select-all", &[("user-select", "all")]),
    ("select-auto", &[("user-select", "auto")]),
    // borders
    ("border", &[("border-width", "1px")]),
    ("border-solid", &[("border-style", "solid")]),
    ("border-dashed", &[("border-style", "dashed")]),
    ("border-dotted", &[("border-style", "dotted")]),
    ("border-none", &[("border-style", "none")]),
    ("rounded", &[("border-radius", "0.25rem")]),
    ("rounded-none", &[("border-radius", "0px")]),
    ("rounded-sm", &[("border-radius", "0.125rem")]),
    ("rounded-md", &[("border-radius", "0.375rem")]),
    ("rounded-lg", &[("border-radius", "0.5rem")]),
    ("rounded-xl", &[("border-radius", "0.75rem")]),
    ("rounded-2xl", &[("border-radius", "1rem")]),
    ("rounded-3xl", &[("border-radius", "1.5rem")]),
    ("rounded-full", &[("border-radius", "9999px")]),
    // misc
    ("container", &[("width", "100%")]),
    ("box-border", &[("box-sizing", "border-box")]),
    ("box-content", &[("box-sizing", "content-box")]),
    ("object-cover", &[("object-fit", "cover")]),
    ("object-contain", &[("object-fit", "contain")]),
    ("resize-none", &[("resize", "none")]),
    ("transition", &[("transition-duration", "150ms")]),
];

/// Spacing families: prefix, properties, whether a leading `-` is allowed
const SPACING: &[(&str, &[&str], bool)] = &[
    ("p", &["padding"], false),
    ("px", &["padding-left", "padding-right"], false),
    ("py", &["padding-top", "padding-bottom"], false),
    ("pt", &["padding-top"], false),
    ("pr", &["padding-right"], false),
    ("pb", &["padding-bottom"], false),
    ("pl", &["padding-left"], false),
    ("ps", &["padding-inline-start"], false),
    ("pe", &["padding-inline-end"], false),
    ("m", &["margin"], true),
    ("mx", &["margin-left", "margin-right"], true),
    ("my", &["margin-top", "margin-bottom"], true),
    ("mt", &["margin-top"], true),
    ("mr", &["margin-right"], true),
    ("mb", &["margin-bottom"], true),
    ("ml", &["margin-left"], true),
    ("ms", &["margin-inline-start"], true),
    ("me", &["margin-inline-end"], true),
    ("gap", &["gap"], false),
    ("gap-x", &["column-gap"], false),
    ("gap-y", &["row-gap"], false),
    ("inset", &["inset"], true),
    ("inset-x", &["left", "right"], true),
    ("inset-y", &["top", "bottom"], true),
    ("top", &["top"], true),
    ("right", &["right"], true),
    ("bottom", &["bottom"], true),
    ("left", &["left"], true),
];

/// Sizing families: prefix, properties, what `screen` means
const SIZING: &[(&str, &[&str], &str)] = &[
    ("w", &["width"], "100vw"),
    ("h", &["height"], "100vh"),
    ("size", &["width", "height"], "100vw"),
    ("min-w", &["min-width"], "100vw"),
    ("min-h", &["min-height"], "100vh"),
    ("max-w", &["max-width"], "100vw"),
    ("max-h", &["max-height"], "100vh"),
];

/// Arbitrary-value categories: `prefix-[value]`
const ARBITRARY: &[(&str, &[&str])] = &[
    ("bg", &["background-color"]),
    ("border", &["border-width"]),
    ("rounded", &["border-radius"]),
    ("leading", &["line-height"]),
    ("tracking", &["letter-spacing"]),
    ("opacity", &["opacity"]),
    ("z", &["z-index"]),
    ("grid-cols", &["grid-template-columns"]),
    ("grid-rows", &["grid-template-rows"]),
    ("font", &["font-family"]),
    ("shadow", &["box-shadow"]),
    ("duration", &["transition-duration"]),
];

fn keyword_map() -> &'static HashMap<&'static str, &'static [(&'static str, &'static str)]> {
    static KEYWORD_MAP: OnceLock<HashMap<&'static str, &'static [(&'static str, &'static str)]>> =
        OnceLock::new();
    KEYWORD_MAP.get_or_init(|| KEYWORDS.iter().copied().collect())
}

/// Whether `token` is a whole-token utility keyword (`flex`, `hidden`, `truncate`)
pub fn is_keyword(token: &str) -> bool {
    keyword_map().contains_key(token)
}

/// Declarations for a utility token, or `None` when it is not recognised
pub fn interpret(token: &str) -> Option<Vec<Declaration>> {
    if token.contains(':') && !token.starts_with('[') {
        return None;
    }

    if let Some(fixed) = keyword_map().get(token) {
        return Some(
            fixed
                .iter()
                .map(|(property, value)| Declaration::new(*property, *value))
                .collect(),
        );
    }

    if let Some(declaration) = arbitrary_property(token) {
        return Some(vec![declaration]);
    }

    spacing(token)
        .or_else(|| sizing(token))
        .or_else(|| numeric(token))
        .or_else(|| arbitrary(token))
}

/// `[property:value]`
fn arbitrary_property(token: &str) -> Option<Declaration> {
    let inner = token.strip_prefix('[')?.strip_suffix(']')?;
    let (property, value) = inner.split_once(':')?;
    let is_property_name = |b: u8| b.is_ascii_lowercase() || b == b'-';
    if property.is_empty() || !property.bytes().all(is_property_name) {
        return None;
    }
    Some(Declaration::new(property, arbitrary_value(value)?))
}

fn spacing(token: &str) -> Option<Vec<Declaration>> {
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    // Longest prefix first so `gap-x-2` is not read as `gap` + `x-2`
    let mut best: Option<(&[&str], bool, &str)> = None;
    for (prefix, properties, allows_negative) in SPACING {
        if let Some(raw) = body.strip_prefix(prefix).and_then(|r| r.strip_prefix('-')) {
            if best.map(|(_, _, r)| raw.len() < r.len()).unwrap_or(true) {
                best = Some((*properties, *allows_negative, raw));
            }
        }
    }

    let (properties, allows_negative, raw) = best?;
    if negative && !allows_negative {
        return None;
    }
    let value = match raw {
        "auto" if !negative => "auto".to_string(),
        "full" if !negative => "100%".to_string(),
        _ => parse_spacing_value(raw, negative)
            .or_else(|| parse_fraction(raw, negative))?,
    };
    Some(declarations(properties, &value))
}

fn sizing(token: &str) -> Option<Vec<Declaration>> {
    let mut best: Option<(&[&str], &str, &str)> = None;
    for (prefix, properties, screen) in SIZING {
        if let Some(raw) = token.strip_prefix(prefix).and_then(|r| r.strip_prefix('-')) {
            if best.map(|(_, _, r)| raw.len() < r.len()).unwrap_or(true) {
                best = Some((*properties, *screen, raw));
            }
        }
    }

    let (properties, screen, raw) = best?;
    let value = match raw {
        "auto" => "auto".to_string(),
        "full" => "100%".to_string(),
        "screen" => screen.to_string(),
        "min" => "min-content".to_string(),
        "max" => "max-content".to_string(),
        "fit" => "fit-content".to_string(),
        "none" => "none".to_string(),
        _ => parse_spacing_value(raw, false).or_else(|| parse_fraction(raw, false))?,
    };
    Some(declarations(properties, &value))
}

/// Integer-valued families: `z-10`, `opacity-50`, `border-2`, `order-1`
fn numeric(token: &str) -> Option<Vec<Declaration>> {
    let (prefix, raw) = token.rsplit_once('-')?;
    let n: u32 = raw.parse().ok()?;
    let declaration = match prefix {
        "z" => Declaration::new("z-index", n.to_string()),
        "opacity" if n <= 100 => Declaration::new("opacity", format_number(n as f64 / 100.0)),
        "border" => Declaration::new("border-width", format!("{}px", n)),
        "order" => Declaration::new("order", n.to_string()),
        "duration" => Declaration::new("transition-duration", format!("{}ms", n)),
        _ => return None,
    };
    Some(vec![declaration])
}

/// `prefix-[value]` for the categorized prefixes plus `text-[...]`
fn arbitrary(token: &str) -> Option<Vec<Declaration>> {
    let open = token.find("-[")?;
    let (prefix, rest) = (&token[..open], &token[open + 1..]);
    let value = arbitrary_value(rest.strip_prefix('[')?.strip_suffix(']')?)?;

    if prefix == "text" {
        let property = if looks_like_length(&value) {
            "font-size"
        } else {
            "color"
        };
        return Some(vec![Declaration::new(property, value)]);
    }

    ARBITRARY
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, properties)| declarations(properties, &value))
}

/// Bracket contents with `_` read as a space
fn arbitrary_value(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    Some(raw.replace('_', " "))
}

/// Resolve a spacing scale step (`4` → `1rem`), `px`, or a bracketed value
fn parse_spacing_value(raw: &str, negative: bool) -> Option<String> {
    let sign = if negative { "-" } else { "" };
    if raw == "px" {
        return Some(format!("{}1px", sign));
    }
    if raw == "0" {
        return Some("0px".to_string());
    }
    if is_spacing_multiplier(raw) {
        let n: f64 = raw.parse().ok()?;
        return Some(format!("{}{}rem", sign, format_number(n * 0.25)));
    }
    if let Some(custom) = raw.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        let value = arbitrary_value(custom)?;
        return Some(if negative {
            format!("calc({} * -1)", value)
        } else {
            value
        });
    }
    None
}

fn parse_fraction(raw: &str, negative: bool) -> Option<String> {
    let (num, den) = raw.split_once('/')?;
    let num: u32 = num.parse().ok()?;
    let den: u32 = den.parse().ok()?;
    if den == 0 {
        return None;
    }
    let sign = if negative { "-" } else { "" };
    let percent = (num as f64 / den as f64) * 100.0;
    Some(format!("{}{}%", sign, format_number((percent * 1e6).round() / 1e6)))
}

/// Whole numbers and halves/quarters (`2`, `2.5`, `0.75`)
fn is_spacing_multiplier(raw: &str) -> bool {
    let mut parts = raw.split('.');
    let whole = parts.next().unwrap_or("");
    let frac = parts.next();
    parts.next().is_none()
        && !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && frac
            .map(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
            .unwrap_or(true)
}

fn looks_like_length(value: &str) -> bool {
    ["px", "rem", "em", "%", "vw", "vh", "pt"]
        .iter()
        .any(|unit| value.ends_with(unit))
        || value.starts_with("clamp(")
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn declarations(properties: &[&str], value: &str) -> Vec<Declaration> {
    properties
        .iter()
        .map(|property| Declaration::new(*property, value))
        .collect()
}
