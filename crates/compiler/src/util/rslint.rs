use rslint_parser::{ast::Expr, parse_expr, AstNode, SyntaxKind, SyntaxNodeExt};
use std::ops::Range;

pub fn parse_js_expr(text: &str) -> Option<Expr> {
    // rslint_parser panics on a closing bracket without an opener
    if !brackets_balanced(text) {
        return None;
    }
    let parsed = parse_expr(text, 0);
    if !parsed.errors().is_empty() {
        return None;
    }
    // range should be equal after removing trailing trivia(comment/whitespace)
    // otherwise the text is not a single expression
    parsed.syntax().try_to().filter(|n: &Expr| {
        let r: Range<usize> = Range::from(n.syntax().trimmed_range());
        r.end - r.start == text.trim().len()
    })
}

/// Brackets outside string literals and comments pair up.
/// Template literals are skipped whole, `${}` included.
fn brackets_balanced(text: &str) -> bool {
    let mut open = vec![];
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '(' | '[' | '{' => open.push(c),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if open.pop() != Some(expected) {
                    return false;
                }
            }
            '"' | '\'' | '`' => {
                while let Some(s) = chars.next() {
                    if s == '\\' {
                        chars.next();
                    } else if s == c {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                chars.by_ref().find(|&s| s == '\n');
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for s in chars.by_ref() {
                    if prev == '*' && s == '/' {
                        break;
                    }
                    prev = s;
                }
            }
            _ => {}
        }
    }
    open.is_empty()
}

/// `a`, `a.b`, `a[b]` can be assigned to. Used by v-model and v-on.
pub fn is_member_expression(text: &str) -> bool {
    matches!(
        parse_js_expr(text),
        Some(Expr::NameRef(_)) | Some(Expr::DotExpr(_)) | Some(Expr::BracketExpr(_))
    )
}

/// An identifier reference found in an expression.
#[derive(Debug, PartialEq, Eq)]
pub struct IdentRef {
    /// byte range in the parsed text
    pub range: Range<usize>,
    /// `{ a }` needs to be expanded to `{ a: _ctx.a }`
    pub is_shorthand: bool,
}

/// Collects references in source order.
pub fn collect_identifiers(root: &Expr) -> Vec<IdentRef> {
    let mut refs = vec![];
    root.syntax().descendants_with(&mut |node| {
        let is_shorthand = node
            .parent()
            .map_or(false, |p| p.kind() == SyntaxKind::IDENT_PROP);
        // shorthand property may hold its name as NAME
        let is_ref = match node.kind() {
            SyntaxKind::NAME_REF => true,
            SyntaxKind::NAME => is_shorthand,
            _ => false,
        };
        if !is_ref {
            return true;
        }
        refs.push(IdentRef {
            range: Range::from(node.trimmed_range()),
            is_shorthand,
        });
        true
    });
    refs
}

/// Names bound inside the expression, e.g. arrow function params.
/// They shadow outer identifiers in the whole expression.
pub fn collect_local_names(root: &Expr) -> Vec<Range<usize>> {
    let mut names = vec![];
    root.syntax().descendants_with(&mut |node| {
        if node.kind() != SyntaxKind::NAME {
            return true;
        }
        let is_binding = node.parent().map_or(false, |p| {
            matches!(p.kind(), SyntaxKind::SINGLE_PATTERN | SyntaxKind::ARROW_EXPR)
        });
        if is_binding {
            names.push(Range::from(node.trimmed_range()));
        }
        true
    });
    names
}

pub fn is_fn_expression(text: &str) -> bool {
    matches!(
        parse_js_expr(text),
        Some(Expr::ArrowExpr(_)) | Some(Expr::FnExpr(_))
    )
}
