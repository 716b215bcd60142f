//! Named character references recognized in text and attribute values.
//! Entries without a trailing semicolon are the legacy forms browsers
//! still accept.
use phf::{phf_map, Map};

pub static NAMED_CHAR_REF: Map<&'static str, &'static str> = phf_map! {
    "amp;" => "&",
    "amp" => "&",
    "AMP;" => "&",
    "AMP" => "&",
    "lt;" => "<",
    "lt" => "<",
    "LT;" => "<",
    "LT" => "<",
    "gt;" => ">",
    "gt" => ">",
    "GT;" => ">",
    "GT" => ">",
    "quot;" => "\"",
    "quot" => "\"",
    "QUOT;" => "\"",
    "QUOT" => "\"",
    "apos;" => "'",
    "nbsp;" => "\u{a0}",
    "nbsp" => "\u{a0}",
    "copy;" => "\u{a9}",
    "copy" => "\u{a9}",
    "COPY;" => "\u{a9}",
    "reg;" => "\u{ae}",
    "reg" => "\u{ae}",
    "REG;" => "\u{ae}",
    "trade;" => "\u{2122}",
    "TRADE;" => "\u{2122}",
    "shy;" => "\u{ad}",
    "shy" => "\u{ad}",
    "deg;" => "\u{b0}",
    "deg" => "\u{b0}",
    "plusmn;" => "\u{b1}",
    "plusmn" => "\u{b1}",
    "times;" => "\u{d7}",
    "times" => "\u{d7}",
    "divide;" => "\u{f7}",
    "divide" => "\u{f7}",
    "micro;" => "\u{b5}",
    "micro" => "\u{b5}",
    "middot;" => "\u{b7}",
    "middot" => "\u{b7}",
    "para;" => "\u{b6}",
    "para" => "\u{b6}",
    "sect;" => "\u{a7}",
    "sect" => "\u{a7}",
    "laquo;" => "\u{ab}",
    "laquo" => "\u{ab}",
    "raquo;" => "\u{bb}",
    "raquo" => "\u{bb}",
    "iexcl;" => "\u{a1}",
    "iexcl" => "\u{a1}",
    "iquest;" => "\u{bf}",
    "iquest" => "\u{bf}",
    "cent;" => "\u{a2}",
    "cent" => "\u{a2}",
    "pound;" => "\u{a3}",
    "pound" => "\u{a3}",
    "yen;" => "\u{a5}",
    "yen" => "\u{a5}",
    "euro;" => "\u{20ac}",
    "curren;" => "\u{a4}",
    "curren" => "\u{a4}",
    "frac12;" => "\u{bd}",
    "frac12" => "\u{bd}",
    "frac14;" => "\u{bc}",
    "frac14" => "\u{bc}",
    "frac34;" => "\u{be}",
    "frac34" => "\u{be}",
    "sup1;" => "\u{b9}",
    "sup1" => "\u{b9}",
    "sup2;" => "\u{b2}",
    "sup2" => "\u{b2}",
    "sup3;" => "\u{b3}",
    "sup3" => "\u{b3}",
    "ndash;" => "\u{2013}",
    "mdash;" => "\u{2014}",
    "lsquo;" => "\u{2018}",
    "rsquo;" => "\u{2019}",
    "sbquo;" => "\u{201a}",
    "ldquo;" => "\u{201c}",
    "rdquo;" => "\u{201d}",
    "bdquo;" => "\u{201e}",
    "dagger;" => "\u{2020}",
    "Dagger;" => "\u{2021}",
    "bull;" => "\u{2022}",
    "hellip;" => "\u{2026}",
    "permil;" => "\u{2030}",
    "prime;" => "\u{2032}",
    "Prime;" => "\u{2033}",
    "lsaquo;" => "\u{2039}",
    "rsaquo;" => "\u{203a}",
    "ensp;" => "\u{2002}",
    "emsp;" => "\u{2003}",
    "thinsp;" => "\u{2009}",
    "zwnj;" => "\u{200c}",
    "zwj;" => "\u{200d}",
    "lrm;" => "\u{200e}",
    "rlm;" => "\u{200f}",
    "larr;" => "\u{2190}",
    "uarr;" => "\u{2191}",
    "rarr;" => "\u{2192}",
    "darr;" => "\u{2193}",
    "harr;" => "\u{2194}",
    "lArr;" => "\u{21d0}",
    "rArr;" => "\u{21d2}",
    "hArr;" => "\u{21d4}",
    "forall;" => "\u{2200}",
    "part;" => "\u{2202}",
    "exist;" => "\u{2203}",
    "empty;" => "\u{2205}",
    "nabla;" => "\u{2207}",
    "isin;" => "\u{2208}",
    "notin;" => "\u{2209}",
    "sum;" => "\u{2211}",
    "minus;" => "\u{2212}",
    "radic;" => "\u{221a}",
    "infin;" => "\u{221e}",
    "and;" => "\u{2227}",
    "or;" => "\u{2228}",
    "cap;" => "\u{2229}",
    "cup;" => "\u{222a}",
    "asymp;" => "\u{2248}",
    "ne;" => "\u{2260}",
    "equiv;" => "\u{2261}",
    "le;" => "\u{2264}",
    "ge;" => "\u{2265}",
    "alpha;" => "\u{3b1}",
    "beta;" => "\u{3b2}",
    "gamma;" => "\u{3b3}",
    "delta;" => "\u{3b4}",
    "epsilon;" => "\u{3b5}",
    "lambda;" => "\u{3bb}",
    "mu;" => "\u{3bc}",
    "pi;" => "\u{3c0}",
    "sigma;" => "\u{3c3}",
    "omega;" => "\u{3c9}",
    "Omega;" => "\u{3a9}",
    "hearts;" => "\u{2665}",
    "spades;" => "\u{2660}",
    "clubs;" => "\u{2663}",
    "diams;" => "\u{2666}",
    "check;" => "\u{2713}",
    "star;" => "\u{2606}",
    "starf;" => "\u{2605}",
    "Tab;" => "\t",
    "NewLine;" => "\n",
    "excl;" => "!",
    "num;" => "#",
    "dollar;" => "$",
    "percnt;" => "%",
    "lpar;" => "(",
    "rpar;" => ")",
    "ast;" => "*",
    "plus;" => "+",
    "comma;" => ",",
    "period;" => ".",
    "sol;" => "/",
    "colon;" => ":",
    "semi;" => ";",
    "equals;" => "=",
    "quest;" => "?",
    "commat;" => "@",
    "lsqb;" => "[",
    "bsol;" => "\\",
    "rsqb;" => "]",
    "lowbar;" => "_",
    "grave;" => "`",
    "lcub;" => "{",
    "verbar;" => "|",
    "rcub;" => "}",
    "Agrave;" => "\u{c0}",
    "Aacute;" => "\u{c1}",
    "Auml;" => "\u{c4}",
    "Aring;" => "\u{c5}",
    "Ccedil;" => "\u{c7}",
    "Eacute;" => "\u{c9}",
    "Ouml;" => "\u{d6}",
    "Uuml;" => "\u{dc}",
    "szlig;" => "\u{df}",
    "agrave;" => "\u{e0}",
    "aacute;" => "\u{e1}",
    "auml;" => "\u{e4}",
    "aring;" => "\u{e5}",
    "ccedil;" => "\u{e7}",
    "egrave;" => "\u{e8}",
    "eacute;" => "\u{e9}",
    "ntilde;" => "\u{f1}",
    "ouml;" => "\u{f6}",
    "uuml;" => "\u{fc}",
};
