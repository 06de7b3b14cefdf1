//! Recursive-descent parser over a cooked token stream.
//!
//! Mirrors the lexer's two-layer split: this crate never looks at bytes,
//! only at [`Token`]s. Parse methods that can fail return `Option`; on
//! failure the caller is responsible for deciding whether to recover.

use mcdoc_diagnostic::{Diagnostic, DiagnosticCode, DiagnosticQueue};
use mcdoc_ir::{
    FloatRange, Interner, IntRange, Keyword, NumberValue, NumericKind, PrimArrayKind,
    ResourceLocation, Span, Symbol, Token, TokenKind,
};

use crate::ast::{
    AccessorKey, AttrLeaf, AttrTree, AttrValue, Attribute, Delimiter, DispatchStmt, EnumBaseKind,
    EnumDef, EnumVariant, EnumVariantValue, FieldKey, File, GenericParams, Index, Injection,
    InjectionKind, Item, Path, StaticKey, StructDef, StructField, TypeAliasDef, TypeExpr,
    TypeExprKind, UseStmt, ValueRange,
};

/// Parse one file's tokens into an AST plus whatever diagnostics the parse
/// produced. `tokens` must end with an `Eof` token, as produced by
/// `mcdoc_lexer::lex`.
#[must_use]
pub fn parse_file(tokens: &[Token], logical_path: &str, interner: &Interner) -> (File, DiagnosticQueue) {
    let mut parser = Parser {
        tokens,
        pos: 0,
        logical_path,
        interner,
        diagnostics: DiagnosticQueue::new(),
    };
    let file = parser.parse_file();
    tracing::trace!(path = logical_path, items = file.items.len(), "parsed file");
    (file, parser.diagnostics)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    logical_path: &'a str,
    interner: &'a Interner,
    diagnostics: DiagnosticQueue,
}

const ITEM_START_KEYWORDS: [Keyword; 6] = [
    Keyword::Struct,
    Keyword::Enum,
    Keyword::TypeAlias,
    Keyword::Use,
    Keyword::Inject,
    Keyword::Dispatch,
];

impl<'a> Parser<'a> {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].kind
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos.min(self.tokens.len() - 1)].span
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        matches!(self.peek(), TokenKind::Keyword(k) if *k == kw)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> bool {
        if self.eat(&kind) {
            true
        } else {
            self.error_here(format!("expected {what}, found {}", self.peek().describe()));
            false
        }
    }

    fn error_here(&mut self, message: impl Into<String>) {
        self.push(DiagnosticCode::UnexpectedToken, self.peek_span(), message);
    }

    fn push(&mut self, code: DiagnosticCode, span: Span, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::new(code, self.logical_path, span, message));
    }

    fn expect_ident(&mut self) -> Option<Symbol> {
        match self.peek().clone() {
            TokenKind::Ident(sym) => {
                self.bump();
                Some(sym)
            }
            _ => {
                self.error_here(format!("expected identifier, found {}", self.peek().describe()));
                None
            }
        }
    }

    /// An identifier in name-declaring position: struct/enum/type-alias
    /// names. Reserved words are rejected here, not at lex time, since the
    /// same text is a valid identifier in other positions.
    fn expect_declared_name(&mut self) -> Option<Symbol> {
        if let TokenKind::Keyword(kw) = self.peek().clone() {
            self.push(
                DiagnosticCode::ReservedWordAsIdentifier,
                self.peek_span(),
                format!("`{}` is a reserved word and cannot name a declaration", kw.text()),
            );
            self.bump();
            return None;
        }
        self.expect_ident()
    }

    fn recover_to_item_boundary(&mut self) {
        while !self.at_eof() {
            if let TokenKind::Keyword(kw) = self.peek() {
                if ITEM_START_KEYWORDS.contains(kw) {
                    return;
                }
            }
            self.bump();
        }
    }

    // ---- file / items -----------------------------------------------

    fn parse_file(&mut self) -> File {
        let mut items = Vec::new();
        while !self.at_eof() {
            match self.parse_item() {
                Some(item) => items.push(item),
                None => self.recover_to_item_boundary(),
            }
        }
        File { items }
    }

    fn parse_item(&mut self) -> Option<Item> {
        let (attrs, doc) = self.parse_prelim();
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Struct) => self.parse_struct_def(attrs, doc).map(Item::Struct),
            TokenKind::Keyword(Keyword::Enum) => self.parse_enum_def(attrs, doc).map(Item::Enum),
            TokenKind::Keyword(Keyword::TypeAlias) => {
                self.parse_type_alias_def(attrs, doc).map(Item::TypeAlias)
            }
            TokenKind::Keyword(Keyword::Use) => self.parse_use_stmt().map(Item::Use),
            TokenKind::Keyword(Keyword::Inject) => self.parse_injection(attrs).map(Item::Injection),
            TokenKind::Keyword(Keyword::Dispatch) => self.parse_dispatch_stmt(attrs).map(Item::Dispatch),
            TokenKind::Eof => None,
            _ => {
                self.error_here(format!("expected a top-level item, found {}", self.peek().describe()));
                None
            }
        }
    }

    // ---- prelim: doc comments + attributes ---------------------------

    fn parse_prelim(&mut self) -> (Vec<Attribute>, Option<Symbol>) {
        let mut attrs = Vec::new();
        let mut doc: Option<Symbol> = None;
        loop {
            match self.peek().clone() {
                TokenKind::DocComment(sym) => {
                    self.bump();
                    doc = Some(sym);
                }
                TokenKind::HashBracket => {
                    if let Some(attr) = self.parse_attribute() {
                        attrs.push(attr);
                    }
                }
                _ => break,
            }
        }
        (attrs, doc)
    }

    fn parse_attribute(&mut self) -> Option<Attribute> {
        let start = self.peek_span();
        self.bump(); // `#[`
        let name = self.expect_ident()?;
        let value = if self.eat(&TokenKind::Equal) {
            Some(self.parse_attr_value()?)
        } else if self.check(&TokenKind::RBracket) {
            None
        } else {
            Some(AttrValue::Tree(self.parse_attr_tree(None)))
        };
        let end = self.peek_span();
        self.expect(TokenKind::RBracket, "`]`");
        Some(Attribute {
            name,
            value,
            span: start.merge(end),
        })
    }

    fn parse_attr_value(&mut self) -> Option<AttrValue> {
        if let Some(delim) = self.opening_delimiter() {
            self.bump();
            return Some(AttrValue::Tree(self.parse_attr_tree(Some(delim))));
        }
        self.parse_attr_leaf().map(AttrValue::Leaf)
    }

    fn opening_delimiter(&self) -> Option<Delimiter> {
        match self.peek() {
            TokenKind::LParen => Some(Delimiter::Paren),
            TokenKind::LBracket => Some(Delimiter::Bracket),
            TokenKind::LBrace => Some(Delimiter::Brace),
            _ => None,
        }
    }

    fn closing_for(delim: Delimiter) -> TokenKind {
        match delim {
            Delimiter::Paren => TokenKind::RParen,
            Delimiter::Bracket => TokenKind::RBracket,
            Delimiter::Brace => TokenKind::RBrace,
        }
    }

    fn parse_attr_leaf(&mut self) -> Option<AttrLeaf> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::True) => {
                self.bump();
                Some(AttrLeaf::Bool(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.bump();
                Some(AttrLeaf::Bool(false))
            }
            TokenKind::Number(n) => {
                self.bump();
                Some(AttrLeaf::Number(mcdoc_ir::TypedNumber::new(n.kind, n.value)))
            }
            TokenKind::String(sym) => {
                self.bump();
                Some(AttrLeaf::Str(sym))
            }
            TokenKind::Ident(sym) => {
                self.bump();
                Some(AttrLeaf::Ident(sym))
            }
            TokenKind::ResourceLocation(loc) => {
                self.bump();
                Some(AttrLeaf::ResLoc(loc))
            }
            _ => {
                self.error_here("expected an attribute value");
                None
            }
        }
    }

    /// Parses a tree body: positional values, then `name = value` /
    /// `name TreeValue` named values. `delim` is `None` for the bare
    /// `#[Ident TreeValue]` form with no surrounding bracket consumed yet
    /// (the value immediately follows the name with no delimiter token).
    fn parse_attr_tree(&mut self, delim: Option<Delimiter>) -> AttrTree {
        let mut tree = AttrTree {
            delimiter: delim,
            positional: Vec::new(),
            named: Vec::new(),
        };
        let Some(delim) = delim else {
            if let Some(value) = self.parse_attr_value() {
                tree.positional.push(value);
            }
            return tree;
        };
        let closing = Self::closing_for(delim);
        let mut seen_named = false;
        while !self.check(&closing) && !self.at_eof() {
            if matches!(self.peek(), TokenKind::Ident(_)) && self.next_is_attr_assignment() {
                seen_named = true;
                let Some(name) = self.expect_ident() else { break };
                let value = if self.eat(&TokenKind::Equal) {
                    match self.parse_attr_value() {
                        Some(v) => v,
                        None => break,
                    }
                } else {
                    match self.opening_delimiter() {
                        Some(d) => {
                            self.bump();
                            AttrValue::Tree(self.parse_attr_tree(Some(d)))
                        }
                        None => break,
                    }
                };
                tree.named.push((name, value));
            } else if seen_named {
                self.error_here("positional attribute value after named values");
                break;
            } else {
                let Some(value) = self.parse_attr_value() else { break };
                tree.positional.push(value);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(closing, "closing delimiter");
        tree
    }

    /// `true` if the current `Ident` token begins a `name = …` or
    /// `name (tree)` named value rather than a standalone positional ident.
    fn next_is_attr_assignment(&self) -> bool {
        matches!(self.peek_at(1), TokenKind::Equal)
            || matches!(self.peek_at(1), TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace)
    }

    // ---- declarations --------------------------------------------------

    fn parse_optional_generic_params(&mut self) -> GenericParams {
        let mut params = Vec::new();
        if self.eat(&TokenKind::Less) {
            while !self.check(&TokenKind::Greater) && !self.at_eof() {
                if let Some(sym) = self.expect_ident() {
                    params.push(sym);
                }
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::Greater, "`>`");
        }
        GenericParams { params }
    }

    fn parse_struct_def(&mut self, attrs: Vec<Attribute>, doc: Option<Symbol>) -> Option<StructDef> {
        let start = self.peek_span();
        self.bump(); // `struct`
        let name = self.expect_declared_name()?;
        let generics = self.parse_optional_generic_params();
        let body_start = self.peek_span();
        self.expect(TokenKind::LBrace, "`{`");
        let fields = self.parse_struct_fields();
        let body_end = self.peek_span();
        self.expect(TokenKind::RBrace, "`}`");
        let body = TypeExpr {
            kind: TypeExprKind::Struct { fields },
            attrs: Vec::new(),
            span: body_start.merge(body_end),
        };
        Some(StructDef {
            name,
            generics,
            body,
            attrs,
            doc,
            span: start.merge(body_end),
        })
    }

    fn parse_struct_fields(&mut self) -> Vec<StructField> {
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_eof() {
            if let Some(field) = self.parse_struct_field() {
                fields.push(field);
            } else {
                self.bump();
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        fields
    }

    fn parse_struct_field(&mut self) -> Option<StructField> {
        let (attrs, doc) = self.parse_prelim();
        let start = self.peek_span();
        if self.eat(&TokenKind::DotDotDot) {
            let ty = self.parse_type_expr()?;
            let span = start.merge(ty.span);
            return Some(StructField::Spread { ty, attrs, span });
        }
        let key = match self.peek().clone() {
            TokenKind::Ident(sym) => {
                self.bump();
                FieldKey::Ident(sym)
            }
            TokenKind::String(sym) => {
                self.bump();
                FieldKey::Str(sym)
            }
            TokenKind::LBracket => {
                self.bump();
                let inner = self.parse_type_expr()?;
                self.expect(TokenKind::RBracket, "`]`");
                FieldKey::Computed(Box::new(inner))
            }
            _ => {
                self.error_here(format!("expected a struct field key, found {}", self.peek().describe()));
                return None;
            }
        };
        let optional = self.eat(&TokenKind::Question);
        self.expect(TokenKind::Colon, "`:`");
        let ty = self.parse_type_expr()?;
        let span = start.merge(ty.span);
        Some(StructField::Named {
            key,
            optional,
            ty,
            attrs,
            doc,
            span,
        })
    }

    fn parse_enum_base_kind(&mut self) -> Option<EnumBaseKind> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::StringType) => {
                self.bump();
                Some(EnumBaseKind::String)
            }
            TokenKind::Keyword(kw) if kw.numeric_kind().is_some() => {
                self.bump();
                Some(EnumBaseKind::Numeric(kw.numeric_kind().unwrap()))
            }
            _ => {
                self.error_here("expected `string` or a numeric primitive as the enum base kind");
                None
            }
        }
    }

    fn parse_enum_def(&mut self, attrs: Vec<Attribute>, doc: Option<Symbol>) -> Option<EnumDef> {
        let start = self.peek_span();
        self.bump(); // `enum`
        self.expect(TokenKind::LParen, "`(`");
        let base_kind = self.parse_enum_base_kind()?;
        self.expect(TokenKind::RParen, "`)`");
        let name = self.expect_declared_name()?;
        let body_start = self.peek_span();
        self.expect(TokenKind::LBrace, "`{`");
        let variants = self.parse_enum_variants(base_kind);
        let body_end = self.peek_span();
        self.expect(TokenKind::RBrace, "`}`");
        let body = TypeExpr {
            kind: TypeExprKind::Enum { base_kind, variants },
            attrs: Vec::new(),
            span: body_start.merge(body_end),
        };
        Some(EnumDef {
            name,
            body,
            attrs,
            doc,
            span: start.merge(body_end),
        })
    }

    fn parse_enum_variants(&mut self, base_kind: EnumBaseKind) -> Vec<EnumVariant> {
        let mut variants = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_eof() {
            if let Some(variant) = self.parse_enum_variant(base_kind) {
                variants.push(variant);
            } else {
                self.bump();
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        variants
    }

    fn parse_enum_variant(&mut self, base_kind: EnumBaseKind) -> Option<EnumVariant> {
        let (attrs, doc) = self.parse_prelim();
        let start = self.peek_span();
        let name = self.expect_ident()?;
        self.expect(TokenKind::Equal, "`=`");
        let value_span = self.peek_span();
        let value = match (self.peek().clone(), base_kind) {
            (TokenKind::Number(n), EnumBaseKind::Numeric(kind)) => {
                self.bump();
                EnumVariantValue::Number(mcdoc_ir::TypedNumber::new(kind, n.value))
            }
            (TokenKind::Number(n), EnumBaseKind::String) => {
                self.push(
                    DiagnosticCode::UnexpectedToken,
                    value_span,
                    "numeric variant value in a string-based enum",
                );
                self.bump();
                EnumVariantValue::Number(mcdoc_ir::TypedNumber::new(NumericKind::Int, n.value))
            }
            (TokenKind::String(sym), EnumBaseKind::String) => {
                self.bump();
                EnumVariantValue::Str(sym)
            }
            (TokenKind::String(sym), EnumBaseKind::Numeric(_)) => {
                self.push(
                    DiagnosticCode::UnexpectedToken,
                    value_span,
                    "string variant value in a numeric enum",
                );
                self.bump();
                EnumVariantValue::Str(sym)
            }
            _ => {
                self.error_here("expected an enum variant value");
                return None;
            }
        };
        let end = self.peek_span();
        Some(EnumVariant {
            name,
            value,
            attrs,
            doc,
            span: start.merge(end),
        })
    }

    fn parse_type_alias_def(&mut self, attrs: Vec<Attribute>, doc: Option<Symbol>) -> Option<TypeAliasDef> {
        let start = self.peek_span();
        self.bump(); // `type`
        let name = self.expect_declared_name()?;
        let generics = self.parse_optional_generic_params();
        self.expect(TokenKind::Equal, "`=`");
        let body = self.parse_type_expr()?;
        let span = start.merge(body.span);
        Some(TypeAliasDef {
            name,
            generics,
            body,
            attrs,
            doc,
            span,
        })
    }

    fn parse_use_stmt(&mut self) -> Option<UseStmt> {
        let start = self.peek_span();
        self.bump(); // `use`
        let path = self.parse_path();
        let alias = if self.eat_keyword(Keyword::As) {
            self.expect_ident()
        } else {
            None
        };
        let end = self.peek_span();
        Some(UseStmt {
            path,
            alias,
            span: start.merge(end),
        })
    }

    fn parse_injection(&mut self, attrs: Vec<Attribute>) -> Option<Injection> {
        let start = self.peek_span();
        self.bump(); // `inject`
        let is_struct = match self.peek().clone() {
            TokenKind::Keyword(Keyword::Struct) => {
                self.bump();
                true
            }
            TokenKind::Keyword(Keyword::Enum) => {
                self.bump();
                false
            }
            _ => {
                self.error_here("expected `struct` or `enum` after `inject`");
                return None;
            }
        };
        let target = self.parse_path();
        let indices = if self.check(&TokenKind::LBracket) {
            self.parse_index_list()
        } else {
            Vec::new()
        };
        self.expect(TokenKind::LBrace, "`{`");
        let kind = if is_struct {
            let fields = self.parse_struct_fields();
            InjectionKind::Struct { fields }
        } else {
            let variants = self.parse_enum_variants(EnumBaseKind::Numeric(NumericKind::Int));
            InjectionKind::Enum { variants }
        };
        let end = self.peek_span();
        self.expect(TokenKind::RBrace, "`}`");
        Some(Injection {
            target,
            indices,
            kind,
            attrs,
            span: start.merge(end),
        })
    }

    fn parse_dispatch_stmt(&mut self, attrs: Vec<Attribute>) -> Option<DispatchStmt> {
        let start = self.peek_span();
        self.bump(); // `dispatch`
        let registry = self.expect_resource_location()?;
        self.expect(TokenKind::LBracket, "`[`");
        let mut keys = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.at_eof() {
            match self.parse_index()? {
                Index::Static(key) => {
                    if key == StaticKey::Fallback {
                        self.push(
                            DiagnosticCode::FallbackOnDispatchLhs,
                            self.peek_span(),
                            "`%fallback` cannot appear on the left-hand side of a dispatch statement",
                        );
                    }
                    keys.push(key);
                }
                Index::Dynamic(_) => {
                    self.push(
                        DiagnosticCode::DynamicIndexInDispatchStatement,
                        self.peek_span(),
                        "a dispatch statement's index list must contain only static keys",
                    );
                }
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "`]`");
        let generics = self.parse_optional_generic_params();
        self.eat_keyword(Keyword::To);
        let target = self.parse_type_expr()?;
        let span = start.merge(target.span);
        Some(DispatchStmt {
            registry,
            keys,
            generics,
            target,
            attrs,
            span,
        })
    }

    fn expect_resource_location(&mut self) -> Option<ResourceLocation> {
        match self.peek().clone() {
            TokenKind::ResourceLocation(loc) => {
                self.bump();
                Some(loc)
            }
            _ => {
                self.error_here("expected a resource location");
                None
            }
        }
    }

    // ---- paths -----------------------------------------------------

    fn parse_path(&mut self) -> Path {
        let mut absolute = false;
        let mut supers = 0u32;
        if self.eat(&TokenKind::ColonColon) {
            absolute = true;
        } else {
            while self.check_keyword(Keyword::Super) {
                self.bump();
                supers += 1;
                if !self.eat(&TokenKind::ColonColon) {
                    break;
                }
            }
        }
        let mut segments = Vec::new();
        loop {
            match self.peek().clone() {
                TokenKind::Ident(sym) => {
                    self.bump();
                    segments.push(sym);
                }
                _ => break,
            }
            if !self.eat(&TokenKind::ColonColon) {
                break;
            }
        }
        Path {
            absolute,
            supers,
            segments,
        }
    }

    // ---- indices -----------------------------------------------------

    fn parse_index_list(&mut self) -> Vec<Index> {
        self.bump(); // `[`
        let mut indices = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.at_eof() {
            match self.parse_index() {
                Some(idx) => indices.push(idx),
                None => {
                    self.bump();
                }
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "`]`");
        indices
    }

    fn parse_index(&mut self) -> Option<Index> {
        if self.check(&TokenKind::LBracket) {
            self.bump();
            let mut chain = Vec::new();
            loop {
                let key = self.parse_accessor_key()?;
                chain.push(key);
                if !self.eat(&TokenKind::Dot) {
                    break;
                }
            }
            self.expect(TokenKind::RBracket, "`]`");
            return Some(Index::Dynamic(chain));
        }
        self.parse_static_key().map(Index::Static)
    }

    fn parse_accessor_key(&mut self) -> Option<AccessorKey> {
        if self.eat(&TokenKind::Percent) {
            let span = self.peek_span();
            let name = self.expect_ident()?;
            return Some(match self.resolve_percent_name(name) {
                PercentName::Key => AccessorKey::Key,
                PercentName::Parent => AccessorKey::Parent,
                PercentName::Other(sym) => AccessorKey::Ident(sym),
                PercentName::Fallback | PercentName::None | PercentName::Unknown => {
                    self.push(
                        DiagnosticCode::UnexpectedToken,
                        span,
                        "`%fallback`/`%none`/`%unknown` are only valid as static keys",
                    );
                    AccessorKey::Key
                }
            });
        }
        match self.peek().clone() {
            TokenKind::Ident(sym) => {
                self.bump();
                Some(AccessorKey::Ident(sym))
            }
            TokenKind::String(sym) => {
                self.bump();
                Some(AccessorKey::Str(sym))
            }
            _ => {
                self.error_here("expected an accessor key");
                None
            }
        }
    }

    fn parse_static_key(&mut self) -> Option<StaticKey> {
        if self.eat(&TokenKind::Percent) {
            let span = self.peek_span();
            let name = self.expect_ident()?;
            return Some(match self.resolve_percent_name(name) {
                PercentName::Fallback => StaticKey::Fallback,
                PercentName::None => StaticKey::None,
                PercentName::Unknown => StaticKey::Unknown,
                PercentName::Key | PercentName::Parent => {
                    self.push(
                        DiagnosticCode::UnexpectedToken,
                        span,
                        "`%key`/`%parent` are only valid inside a dynamic accessor",
                    );
                    StaticKey::Unknown
                }
                PercentName::Other(_) => {
                    self.push(DiagnosticCode::UnexpectedToken, span, "unknown `%`-name");
                    StaticKey::Unknown
                }
            });
        }
        match self.peek().clone() {
            TokenKind::Ident(sym) => {
                self.bump();
                Some(StaticKey::Ident(sym))
            }
            TokenKind::String(sym) => {
                self.bump();
                Some(StaticKey::Str(sym))
            }
            TokenKind::ResourceLocation(loc) => {
                self.bump();
                Some(StaticKey::ResLoc(loc))
            }
            _ => {
                self.error_here("expected a static index key");
                None
            }
        }
    }

    fn resolve_percent_name(&self, sym: Symbol) -> PercentName {
        match self.interner.resolve(sym) {
            "fallback" => PercentName::Fallback,
            "none" => PercentName::None,
            "unknown" => PercentName::Unknown,
            "key" => PercentName::Key,
            "parent" => PercentName::Parent,
            _ => PercentName::Other(sym),
        }
    }

    // ---- type expressions --------------------------------------------

    fn parse_type_expr(&mut self) -> Option<TypeExpr> {
        let (attrs, _doc) = self.parse_prelim();
        let start = self.peek_span();
        let mut kind = self.parse_type_atom()?;
        let mut end = self.peek_span();

        loop {
            if self.check(&TokenKind::Less) && matches!(kind, TypeExprKind::Reference { .. }) {
                let args = self.parse_type_arg_block();
                if let TypeExprKind::Reference { type_args, .. } = &mut kind {
                    *type_args = args;
                }
                end = self.peek_span();
            } else if self.check(&TokenKind::LBracket) {
                let indices = self.parse_index_list();
                let base = TypeExpr {
                    kind,
                    attrs: Vec::new(),
                    span: start.merge(end),
                };
                kind = TypeExprKind::Indexed {
                    base: Box::new(base),
                    indices,
                };
                end = self.peek_span();
            } else {
                break;
            }
        }

        Some(TypeExpr {
            kind,
            attrs,
            span: start.merge(end),
        })
    }

    fn parse_type_arg_block(&mut self) -> Vec<TypeExpr> {
        self.bump(); // `<`
        let mut args = Vec::new();
        while !self.check(&TokenKind::Greater) && !self.at_eof() {
            match self.parse_type_expr() {
                Some(ty) => args.push(ty),
                None => {
                    self.bump();
                }
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Greater, "`>`");
        args
    }

    fn parse_type_atom(&mut self) -> Option<TypeExprKind> {
        match self.peek().clone() {
            TokenKind::ColonColon => Some(self.parse_reference_atom()),
            TokenKind::Keyword(Keyword::Super) => Some(self.parse_reference_atom()),
            TokenKind::Ident(_) => Some(self.parse_reference_atom()),
            TokenKind::Keyword(Keyword::Any) => {
                self.bump();
                Some(TypeExprKind::Any)
            }
            TokenKind::Keyword(Keyword::Unsafe) => {
                self.bump();
                Some(TypeExprKind::Unsafe)
            }
            TokenKind::Keyword(Keyword::Boolean) => {
                self.bump();
                Some(TypeExprKind::Boolean)
            }
            TokenKind::Keyword(Keyword::True) => {
                self.bump();
                Some(TypeExprKind::LiteralBool(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.bump();
                Some(TypeExprKind::LiteralBool(false))
            }
            TokenKind::Keyword(Keyword::StringType) => {
                self.bump();
                let len_range = self.parse_optional_int_range();
                Some(TypeExprKind::StringT { len_range })
            }
            TokenKind::Keyword(kw) if kw.numeric_kind().is_some() => {
                self.bump();
                Some(self.parse_numeric_or_prim_array(kw.numeric_kind().unwrap()))
            }
            TokenKind::Keyword(Keyword::Struct) => {
                self.bump();
                self.expect(TokenKind::LBrace, "`{`");
                let fields = self.parse_struct_fields();
                self.expect(TokenKind::RBrace, "`}`");
                Some(TypeExprKind::Struct { fields })
            }
            TokenKind::Keyword(Keyword::Enum) => {
                self.bump();
                self.expect(TokenKind::LParen, "`(`");
                let base_kind = self.parse_enum_base_kind().unwrap_or(EnumBaseKind::Numeric(NumericKind::Int));
                self.expect(TokenKind::RParen, "`)`");
                self.expect(TokenKind::LBrace, "`{`");
                let variants = self.parse_enum_variants(base_kind);
                self.expect(TokenKind::RBrace, "`}`");
                Some(TypeExprKind::Enum { base_kind, variants })
            }
            TokenKind::Number(n) => {
                self.bump();
                Some(TypeExprKind::LiteralNumber(mcdoc_ir::TypedNumber::new(n.kind, n.value)))
            }
            TokenKind::String(sym) => {
                self.bump();
                Some(TypeExprKind::LiteralString(sym))
            }
            TokenKind::ResourceLocation(loc) => {
                self.bump();
                let indices = if self.check(&TokenKind::LBracket) {
                    self.parse_index_list()
                } else {
                    self.error_here("expected `[` to begin a dispatcher's index list");
                    Vec::new()
                };
                Some(TypeExprKind::Dispatcher { registry: loc, indices })
            }
            TokenKind::LParen => Some(self.parse_union()),
            TokenKind::LBracket => Some(self.parse_list_or_tuple()),
            _ => {
                self.error_here(format!("expected a type, found {}", self.peek().describe()));
                None
            }
        }
    }

    fn parse_reference_atom(&mut self) -> TypeExprKind {
        let path = self.parse_path();
        TypeExprKind::Reference {
            path,
            type_args: Vec::new(),
        }
    }

    fn parse_numeric_or_prim_array(&mut self, kind: NumericKind) -> TypeExprKind {
        let elem_kind = match kind {
            NumericKind::Byte => Some(PrimArrayKind::Byte),
            NumericKind::Int => Some(PrimArrayKind::Int),
            NumericKind::Long => Some(PrimArrayKind::Long),
            _ => None,
        };
        if let Some(elem_kind) = elem_kind {
            if self.check(&TokenKind::LBracket) {
                self.bump();
                let elem_range = self.parse_optional_int_range();
                self.expect(TokenKind::RBracket, "`]`");
                let len_range = self.parse_optional_int_range();
                return TypeExprKind::PrimArray {
                    elem_kind,
                    elem_range,
                    len_range,
                };
            }
        }
        let value_range = self.parse_optional_value_range(kind);
        TypeExprKind::Numeric { kind, value_range }
    }

    fn parse_union(&mut self) -> TypeExprKind {
        self.bump(); // `(`
        if self.eat(&TokenKind::RParen) {
            return TypeExprKind::Union { members: Vec::new() };
        }
        let mut members = Vec::new();
        loop {
            match self.parse_type_expr() {
                Some(ty) => members.push(ty),
                None => {
                    self.bump();
                }
            }
            if self.eat(&TokenKind::Pipe) {
                if self.check(&TokenKind::RParen) {
                    break;
                }
                continue;
            }
            break;
        }
        let end_span = self.peek_span();
        self.expect(TokenKind::RParen, "`)`");
        if members.len() == 1 {
            self.push(
                DiagnosticCode::UnexpectedToken,
                end_span,
                "a single-element union is not permitted; write the member type directly",
            );
        }
        TypeExprKind::Union { members }
    }

    /// `[ T ]` is a list; `[ T , ]` / `[ T, T, … ]` is a tuple. The trailing
    /// comma after exactly one element is the sole disambiguator.
    fn parse_list_or_tuple(&mut self) -> TypeExprKind {
        self.bump(); // `[`
        let mut elems = Vec::new();
        let mut trailing_comma = false;
        while !self.check(&TokenKind::RBracket) && !self.at_eof() {
            match self.parse_type_expr() {
                Some(ty) => elems.push(ty),
                None => {
                    self.bump();
                    continue;
                }
            }
            if self.eat(&TokenKind::Comma) {
                trailing_comma = true;
            } else {
                trailing_comma = false;
                break;
            }
        }
        self.expect(TokenKind::RBracket, "`]`");

        if elems.len() == 1 && !trailing_comma {
            let elem = elems.into_iter().next().unwrap();
            let len_range = self.parse_optional_int_range();
            return TypeExprKind::List {
                elem: Box::new(elem),
                len_range,
            };
        }
        if elems.is_empty() {
            self.error_here("`[]` is neither a valid list (needs an element type) nor a tuple (needs at least one element)");
        }
        TypeExprKind::Tuple { elems }
    }

    // ---- ranges --------------------------------------------------------

    fn range_connector(&self) -> Option<(bool, bool)> {
        match self.peek() {
            TokenKind::DotDot => Some((false, false)),
            TokenKind::DotDotLess => Some((false, true)),
            TokenKind::LessDotDot => Some((true, false)),
            TokenKind::LessDotDotLess => Some((true, true)),
            _ => None,
        }
    }

    fn parse_optional_int_range(&mut self) -> Option<IntRange> {
        if !self.check(&TokenKind::At) {
            return None;
        }
        self.bump();
        Some(self.parse_int_range())
    }

    fn parse_int_range(&mut self) -> IntRange {
        let lower = self.parse_optional_int_literal();
        let Some((exclusive_lower, exclusive_upper)) = self.range_connector() else {
            let v = lower.unwrap_or(0);
            return IntRange {
                lower: Some(v),
                upper: Some(v),
                exclusive_lower: false,
                exclusive_upper: false,
            };
        };
        self.bump();
        let upper = self.parse_optional_int_literal();
        IntRange {
            lower,
            upper,
            exclusive_lower,
            exclusive_upper,
        }
    }

    fn parse_optional_int_literal(&mut self) -> Option<i64> {
        if let TokenKind::Number(n) = self.peek().clone() {
            if let NumberValue::Int(v) = n.value {
                self.bump();
                return Some(v);
            }
        }
        None
    }

    fn parse_optional_value_range(&mut self, kind: NumericKind) -> Option<ValueRange> {
        if !self.check(&TokenKind::At) {
            return None;
        }
        self.bump();
        if kind.is_floating() {
            Some(ValueRange::Float(self.parse_float_range()))
        } else {
            Some(ValueRange::Int(self.parse_int_range()))
        }
    }

    fn parse_float_range(&mut self) -> FloatRange {
        let lower = self.parse_optional_number_as_f64();
        let Some((exclusive_lower, exclusive_upper)) = self.range_connector() else {
            return FloatRange {
                lower,
                upper: lower,
                exclusive_lower: false,
                exclusive_upper: false,
            };
        };
        self.bump();
        let upper = self.parse_optional_number_as_f64();
        FloatRange {
            lower,
            upper,
            exclusive_lower,
            exclusive_upper,
        }
    }

    fn parse_optional_number_as_f64(&mut self) -> Option<f64> {
        if let TokenKind::Number(n) = self.peek().clone() {
            self.bump();
            Some(n.value.as_f64())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcdoc_ir::Interner;

    fn parse(source: &str) -> (File, DiagnosticQueue, Interner) {
        let interner = Interner::new();
        let lexed = mcdoc_lexer::lex(source, "test", &interner);
        assert!(lexed.diagnostics.is_empty(), "lex errors: {:?}", lexed.diagnostics.as_slice());
        let (file, diagnostics) = parse_file(&lexed.tokens, "test", &interner);
        (file, diagnostics, interner)
    }

    #[test]
    fn empty_struct_parses() {
        let (file, diags, _) = parse("struct Foo {}");
        assert!(diags.is_empty());
        assert_eq!(file.items.len(), 1);
        assert!(matches!(file.items[0], Item::Struct(_)));
    }

    #[test]
    fn bracket_with_no_trailing_comma_is_a_list() {
        let (file, diags, _) = parse("type T = [byte]");
        assert!(diags.is_empty());
        let Item::TypeAlias(alias) = &file.items[0] else { panic!("expected alias") };
        assert!(matches!(alias.body.kind, TypeExprKind::List { .. }));
    }

    #[test]
    fn bracket_with_trailing_comma_is_a_one_element_tuple() {
        let (file, diags, _) = parse("type T = [byte,]");
        assert!(diags.is_empty());
        let Item::TypeAlias(alias) = &file.items[0] else { panic!("expected alias") };
        match &alias.body.kind {
            TypeExprKind::Tuple { elems } => assert_eq!(elems.len(), 1),
            other => panic!("expected tuple, got {other:?}"),
        }
    }

    #[test]
    fn single_element_union_is_diagnosed() {
        let (_, diags, _) = parse("type T = ( byte )");
        assert!(!diags.is_empty());
    }

    #[test]
    fn empty_union_is_bottom() {
        let (file, diags, _) = parse("type T = ()");
        assert!(diags.is_empty());
        let Item::TypeAlias(alias) = &file.items[0] else { panic!("expected alias") };
        match &alias.body.kind {
            TypeExprKind::Union { members } => assert!(members.is_empty()),
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn reserved_identifier_as_struct_name_is_diagnosed_and_dropped() {
        let (file, diags, _) = parse("struct int {}");
        assert!(!diags.is_empty());
        assert!(file.items.is_empty());
    }

    #[test]
    fn dispatch_statement_with_multiple_static_keys() {
        let (file, diags, _) = parse("dispatch minecraft:r[uniform, %none] to struct { min?: int }");
        assert!(diags.is_empty());
        let Item::Dispatch(d) = &file.items[0] else { panic!("expected dispatch") };
        assert_eq!(d.keys.len(), 2);
        assert_eq!(d.keys[1], StaticKey::None);
    }

    #[test]
    fn fallback_on_dispatch_lhs_is_diagnosed() {
        let (_, diags, _) = parse("dispatch minecraft:r[%fallback] to any");
        assert!(diags
            .as_slice()
            .iter()
            .any(|d| d.code == DiagnosticCode::FallbackOnDispatchLhs));
    }

    #[test]
    fn dynamic_index_in_dispatch_statement_is_diagnosed() {
        let (_, diags, _) = parse("dispatch minecraft:r[[type]] to any");
        assert!(diags
            .as_slice()
            .iter()
            .any(|d| d.code == DiagnosticCode::DynamicIndexInDispatchStatement));
    }

    #[test]
    fn dynamic_index_in_indexed_type_expr_parses() {
        let (file, diags, _) = parse("type T = struct { type?: (\"uniform\"|\"binomial\"), ...minecraft:r[[type]] }");
        assert!(diags.is_empty());
        let Item::TypeAlias(alias) = &file.items[0] else { panic!("expected alias") };
        let TypeExprKind::Struct { fields } = &alias.body.kind else { panic!("expected struct") };
        let StructField::Spread { ty, .. } = &fields[1] else { panic!("expected spread") };
        assert!(matches!(ty.kind, TypeExprKind::Dispatcher { .. }));
    }

    #[test]
    fn integer_range_with_both_ends_exclusive() {
        let (file, diags, _) = parse("type T = int @ 1<..<2");
        assert!(diags.is_empty());
        let Item::TypeAlias(alias) = &file.items[0] else { panic!("expected alias") };
        let TypeExprKind::Numeric { value_range: Some(ValueRange::Int(r)), .. } = &alias.body.kind else {
            panic!("expected numeric with int range")
        };
        assert!(r.is_empty());
    }

    #[test]
    fn generic_reference_parses_type_args() {
        let (file, diags, _) = parse("type T = Tag<string>");
        assert!(diags.is_empty());
        let Item::TypeAlias(alias) = &file.items[0] else { panic!("expected alias") };
        let TypeExprKind::Reference { type_args, .. } = &alias.body.kind else { panic!("expected reference") };
        assert_eq!(type_args.len(), 1);
    }

    #[test]
    fn injection_into_missing_target_still_parses() {
        let (file, diags, _) = parse("inject struct ::Foo { b?: string }");
        assert!(diags.is_empty());
        assert!(matches!(file.items[0], Item::Injection(_)));
    }

    #[test]
    fn unterminated_struct_body_is_diagnosed_without_panicking() {
        let (_, diags, _) = parse("struct A {");
        assert!(!diags.is_empty());
    }

    #[test]
    fn recovers_to_the_next_item_after_a_malformed_one() {
        let (file, diags, interner) = parse("dispatch\nstruct B {}");
        assert!(!diags.is_empty());
        let Item::Struct(s) = &file.items[0] else { panic!("expected struct") };
        assert_eq!(interner.resolve(s.name), "B");
    }
}

enum PercentName {
    Fallback,
    None,
    Unknown,
    Key,
    Parent,
    Other(Symbol),
}
