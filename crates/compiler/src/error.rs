use super::SourceLocation;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum CompilationErrorKind {
    AbruptClosingOfEmptyComment,
    CDataInHtmlContent,
    DuplicateAttribute,
    EndTagWithAttributes,
    EndTagWithTrailingSolidus,
    EofBeforeTagName,
    EofInComment,
    EofInTag,
    IncorrectlyClosedComment,
    IncorrectlyOpenedComment,
    InvalidFirstCharacterOfTagName,
    MissingAttributeValue,
    MissingEndTagName,
    MissingWhitespaceBetweenAttributes,
    NestedComment,
    UnexpectedEqualsSignBeforeAttributeName,
    UnexpectedCharacterInAttributeName,
    UnexpectedCharacterInUnquotedAttributeValue,
    UnexpectedNullCharacter,
    UnexpectedQuestionMarkInsteadOfTagName,
    UnexpectedSolidusInTag,

    // template specific parse errors
    InvalidEndTag,
    MissingEndTag,
    MissingInterpolationEnd,
    MissingDynamicDirectiveArgumentEnd,
    UnexpectedContentAfterDynamicDirective,
    MissingDirectiveName,
    MissingDirectiveArg,
    MissingDirectiveMod,

    // transform errors
    VIfNoExpression,
    VIfSameKey,
    VElseNoAdjacentIf,
    VForNoExpression,
    VForMalformedExpression,
    VForTemplateKeyPlacement,
    VBindNoExpression,
    VOnNoExpression,
    VModelNoExpression,
    VModelMalformedExpression,
    VModelOnScopeVariable,
    VModelOnInvalidElement,
    VModelArgOnElement,
    VModelOnFileInputElement,
    VMemoNoExpression,
    VSlotUnsupported,
    InvalidExpression,

    // input errors
    InvalidEncoding,
}

/// How bad an error is. Compilation only stops on `Fatal`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl CompilationErrorKind {
    pub fn severity(&self) -> Severity {
        use CompilationErrorKind::*;
        match self {
            InvalidEncoding => Severity::Fatal,
            VIfNoExpression
            | VIfSameKey
            | VElseNoAdjacentIf
            | VForNoExpression
            | VForMalformedExpression
            | VForTemplateKeyPlacement
            | VBindNoExpression
            | VOnNoExpression
            | VModelNoExpression
            | VModelMalformedExpression
            | VModelOnScopeVariable
            | VModelOnInvalidElement
            | VModelArgOnElement
            | VModelOnFileInputElement
            | VMemoNoExpression
            | VSlotUnsupported => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CompilationError {
    pub kind: CompilationErrorKind,
    pub additional_message: Option<String>,
    pub location: SourceLocation,
}

impl CompilationError {
    pub fn new(kind: CompilationErrorKind) -> Self {
        Self {
            kind,
            additional_message: None,
            location: Default::default(),
        }
    }
    pub fn with_location(mut self, loc: SourceLocation) -> Self {
        self.location = loc;
        self
    }
    pub fn with_additional_message(mut self, msg: String) -> Self {
        self.additional_message = Some(msg);
        self
    }
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    fn msg(&self) -> &'static str {
        msg(&self.kind)
    }
}

#[cold]
#[inline(never)]
fn msg(kind: &CompilationErrorKind) -> &'static str {
    use CompilationErrorKind::*;
    match *kind {
        AbruptClosingOfEmptyComment => "Illegal comment.",
        CDataInHtmlContent => "CDATA section is allowed only in XML context.",
        DuplicateAttribute => "Duplicate attribute.",
        EndTagWithAttributes => "End tag cannot have attributes.",
        EndTagWithTrailingSolidus => r#"Illegal "/" in tags."#,
        EofBeforeTagName => "Unexpected EOF in tag.",
        EofInComment => "Unexpected EOF in comment.",
        EofInTag => "Unexpected EOF in tag.",
        IncorrectlyClosedComment => "Incorrectly closed comment.",
        IncorrectlyOpenedComment => "Incorrectly opened comment.",
        InvalidFirstCharacterOfTagName => "Illegal tag name. Use '&lt;' to print '<'.",
        UnexpectedEqualsSignBeforeAttributeName => "Attribute name was expected before '='.",
        MissingAttributeValue => "Attribute value was expected.",
        MissingEndTagName => "End tag name was expected.",
        MissingWhitespaceBetweenAttributes => "Whitespace was expected.",
        NestedComment => "Unexpected '<!--' in comment.",
        UnexpectedCharacterInAttributeName =>
            "Attribute name cannot contain U+0022 (\"), U+0027 ('), and U+003C (<).",
        UnexpectedCharacterInUnquotedAttributeValue =>
            "Unquoted attribute value cannot contain U+0022 (\"), U+0027 (\'), U+003C (<), U+003D (=), and U+0060 (`).",
        UnexpectedQuestionMarkInsteadOfTagName => "'<?' is allowed only in XML context.",
        UnexpectedNullCharacter => "Unexpected null character.",
        UnexpectedSolidusInTag => "Illegal '/' in tags.",

        InvalidEndTag => "Invalid end tag.",
        MissingEndTag => "Element is missing end tag.",
        MissingInterpolationEnd => "Interpolation end sign was not found.",
        MissingDynamicDirectiveArgumentEnd =>
            "End bracket for dynamic directive argument was not found. Note that dynamic directive argument cannot contain spaces.",
        UnexpectedContentAfterDynamicDirective =>
            "Unexpected content was found after a closed dynamic argument. Add a dot as separator if it is a modifier.",
        MissingDirectiveName => "Legal directive name was expected.",
        MissingDirectiveArg => "Directive argument was expected.",
        MissingDirectiveMod => "Directive modifier was expected.",

        VIfNoExpression => "v-if/v-else-if is missing expression.",
        VIfSameKey => "v-if/else branches must use unique keys.",
        VElseNoAdjacentIf => "v-else/v-else-if has no adjacent v-if.",
        VForNoExpression => "v-for is missing expression.",
        VForMalformedExpression => "v-for has invalid expression.",
        VForTemplateKeyPlacement => "<template v-for> key should be placed on the <template> tag.",
        VBindNoExpression => "v-bind is missing expression.",
        VOnNoExpression => "v-on is missing expression.",
        VModelNoExpression => "v-model is missing expression.",
        VModelMalformedExpression => "v-model value must be a valid JavaScript member expression.",
        VModelOnScopeVariable =>
            "v-model cannot be used on v-for scope variables because they are not writable.",
        VModelOnInvalidElement => "v-model can only be used on <input>, <textarea>, <select> and components.",
        VModelArgOnElement => "v-model argument is not supported on plain elements.",
        VModelOnFileInputElement =>
            "v-model cannot be used on file inputs since they are read-only. Use a v-on:change listener instead.",
        VMemoNoExpression => "v-memo is missing expression.",
        VSlotUnsupported => "v-slot is not supported by this compiler.",
        InvalidExpression => "Error parsing JavaScript expression: ",

        InvalidEncoding => "Template source is not valid UTF-8.",
    }
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(additional) = &self.additional_message {
            write!(f, "{}{}", self.msg(), additional)
        } else {
            write!(f, "{}", self.msg())
        }
    }
}

impl std::error::Error for CompilationError {}

/// Receives every recoverable problem found while compiling.
/// Stages each own a handle, so collecting implementations share
/// their storage behind `Rc<RefCell<_>>`.
pub trait ErrorHandler {
    fn on_error(&self, _: CompilationError) {}
}

#[derive(Clone, Default)]
pub struct VecErrorHandler {
    errors: Rc<RefCell<Vec<CompilationError>>>,
}

impl VecErrorHandler {
    pub fn error_count(&self) -> usize {
        self.errors.borrow().len()
    }
    /// drain every collected error, in report order
    pub fn take_errors(&self) -> Vec<CompilationError> {
        std::mem::take(&mut *self.errors.borrow_mut())
    }
}

impl ErrorHandler for VecErrorHandler {
    fn on_error(&self, e: CompilationError) {
        self.errors.borrow_mut().push(e);
    }
}
