//! Knowledge about HTML/SVG tags the parser and transforms rely on.
use phf::{phf_set, Set};

const NATIVE_TAGS: Set<&str> = phf_set! {
    // HTML_TAGS
    "html","body","base","head","link","meta","style","title","address","article","aside","footer",
    "header","h1","h2","h3","h4","h5","h6","nav","section","div","dd","dl","dt","figcaption", "figure",
    "picture","hr","img","li","main","ol","p","pre","ul","a","b","abbr","bdi","bdo","br","cite","code",
    "data","dfn","em","i","kbd","mark","q","rp","rt","ruby","s","samp","small","span","strong","sub","sup",
    "time","u","var","wbr","area","audio","map","track","video","embed","object","param","source",
    "canvas","script","noscript","del","ins","caption","col","colgroup","table","thead","tbody","td",
    "th","tr","button","datalist","fieldset","form","input","label","legend","meter","optgroup",
    "option","output","progress","select","textarea","details","dialog","menu",
    "summary","template","blockquote","iframe","tfoot","slot","xmp","noembed","noframes",
    // SVG_TAGS
    "svg","animate","animateMotion","animateTransform","circle","clipPath","color-profile",
    "defs","desc","discard","ellipse","feBlend","feColorMatrix","feComponentTransfer",
    "feComposite","feConvolveMatrix","feDiffuseLighting","feDisplacementMap",
    "feDistanceLight","feDropShadow","feFlood","feFuncA","feFuncB","feFuncG","feFuncR",
    "feGaussianBlur","feImage","feMerge","feMergeNode","feMorphology","feOffset",
    "fePointLight","feSpecularLighting","feSpotLight","feTile","feTurbulence","filter",
    "foreignObject","g","hatch","hatchpath","image","line","linearGradient","marker","mask",
    "mesh","meshgradient","meshpatch","meshrow","metadata","mpath","path","pattern",
    "polygon","polyline","radialGradient","rect","set","solidcolor","stop","switch","symbol",
    "text","textPath","tspan","unknown","use","view",
};

pub fn is_native_tag(s: &str) -> bool {
    NATIVE_TAGS.contains(s)
}

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];
pub fn is_void_tag(s: &str) -> bool {
    VOID_TAGS.contains(&s)
}

pub fn is_pre_tag(s: &str) -> bool {
    s.eq_ignore_ascii_case("pre")
}

/// Start tags that implicitly close an open `<p>`.
const CLOSES_P: Set<&str> = phf_set! {
    "address","article","aside","blockquote","details","dialog","div","dl","fieldset",
    "figcaption","figure","footer","form","h1","h2","h3","h4","h5","h6","header","hr",
    "main","menu","nav","ol","p","pre","section","table","ul",
};

/// Whether an open element `open` is closed by a start tag `incoming`.
pub fn closes_implicitly(open: &str, incoming: &str) -> bool {
    match open {
        "p" => CLOSES_P.contains(incoming),
        "li" => incoming == "li",
        "dt" | "dd" => incoming == "dt" || incoming == "dd",
        "option" => incoming == "option" || incoming == "optgroup",
        "optgroup" => incoming == "optgroup",
        "tr" => incoming == "tr" || incoming == "tbody" || incoming == "tfoot",
        "td" | "th" => matches!(incoming, "td" | "th" | "tr" | "tbody" | "tfoot"),
        "thead" | "tbody" => incoming == "tbody" || incoming == "tfoot",
        "rp" | "rt" => incoming == "rp" || incoming == "rt",
        _ => false,
    }
}

/// Elements whose end tag may be omitted.
pub fn has_optional_end_tag(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "li"
            | "dt"
            | "dd"
            | "option"
            | "optgroup"
            | "tr"
            | "td"
            | "th"
            | "thead"
            | "tbody"
            | "tfoot"
            | "rp"
            | "rt"
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_implicit_close() {
        assert!(closes_implicitly("p", "div"));
        assert!(!closes_implicitly("p", "span"));
        assert!(closes_implicitly("li", "li"));
        assert!(closes_implicitly("td", "tr"));
        assert!(!closes_implicitly("div", "div"));
    }

    #[test]
    fn test_tags() {
        assert!(is_native_tag("div"));
        assert!(is_native_tag("clipPath"));
        assert!(!is_native_tag("my-comp"));
        assert!(is_void_tag("input"));
        assert!(!is_void_tag("div"));
    }
}
