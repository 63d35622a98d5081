//! AST for legacy (0.19) AiScript scripts.
//!
//! Every node records the byte range of its own written form in the source
//! text as an inclusive [`Loc`]. The range may be narrower than the node's
//! full syntactic extent: parentheses around an expression are never part of
//! the inner node, and composite nodes (calls, property chains, infix sugar)
//! start at whatever token the parser saw first.

use serde::{Deserialize, Serialize};

/// Inclusive byte range of a node in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Loc {
    pub start: usize,
    pub end: usize,
}

impl Loc {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// One past the last byte of the range.
    pub fn end_exclusive(&self) -> usize {
        self.end + 1
    }
}

/// Half-open byte range of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub lo: usize,
    pub hi: usize,
}

impl Span {
    pub fn new(lo: usize, hi: usize) -> Self {
        Self { lo, hi }
    }

    pub fn is_empty(&self) -> bool {
        self.lo >= self.hi
    }

    /// Convert to an inclusive [`Loc`]. Empty spans have no location.
    pub fn to_loc(self) -> Option<Loc> {
        if self.is_empty() {
            None
        } else {
            Some(Loc::new(self.lo, self.hi - 1))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Ns(Namespace),
    Meta(Meta),
    Def(Definition),
    Return(Return),
    Each(Each),
    For(For),
    Loop(Loop),
    Break(Break),
    Continue(Continue),
    Assign(Assign),
    If(If),
    Fn(Function),
    Match(Match),
    Block(Block),
    Exists(Exists),
    Tmpl(Tmpl),
    Str(Str),
    Num(Num),
    Bool(Bool),
    Null(Null),
    Obj(Obj),
    Arr(Arr),
    Not(Not),
    And(BinaryOperation),
    Or(BinaryOperation),
    Identifier(Identifier),
    Call(Call),
    Index(Index),
    Prop(Prop),
}

/// Discriminant of a [`Node`], used in diagnostics and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Ns,
    Meta,
    Def,
    Return,
    Each,
    For,
    Loop,
    Break,
    Continue,
    Assign,
    If,
    Fn,
    Match,
    Block,
    Exists,
    Tmpl,
    Str,
    Num,
    Bool,
    Null,
    Obj,
    Arr,
    Not,
    And,
    Or,
    Identifier,
    Call,
    Index,
    Prop,
    NamedTypeSource,
    FnTypeSource,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Ns => "ns",
            NodeKind::Meta => "meta",
            NodeKind::Def => "def",
            NodeKind::Return => "return",
            NodeKind::Each => "each",
            NodeKind::For => "for",
            NodeKind::Loop => "loop",
            NodeKind::Break => "break",
            NodeKind::Continue => "continue",
            NodeKind::Assign => "assign",
            NodeKind::If => "if",
            NodeKind::Fn => "fn",
            NodeKind::Match => "match",
            NodeKind::Block => "block",
            NodeKind::Exists => "exists",
            NodeKind::Tmpl => "tmpl",
            NodeKind::Str => "str",
            NodeKind::Num => "num",
            NodeKind::Bool => "bool",
            NodeKind::Null => "null",
            NodeKind::Obj => "obj",
            NodeKind::Arr => "arr",
            NodeKind::Not => "not",
            NodeKind::And => "and",
            NodeKind::Or => "or",
            NodeKind::Identifier => "identifier",
            NodeKind::Call => "call",
            NodeKind::Index => "index",
            NodeKind::Prop => "prop",
            NodeKind::NamedTypeSource => "namedTypeSource",
            NodeKind::FnTypeSource => "fnTypeSource",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Ns(_) => NodeKind::Ns,
            Node::Meta(_) => NodeKind::Meta,
            Node::Def(_) => NodeKind::Def,
            Node::Return(_) => NodeKind::Return,
            Node::Each(_) => NodeKind::Each,
            Node::For(_) => NodeKind::For,
            Node::Loop(_) => NodeKind::Loop,
            Node::Break(_) => NodeKind::Break,
            Node::Continue(_) => NodeKind::Continue,
            Node::Assign(_) => NodeKind::Assign,
            Node::If(_) => NodeKind::If,
            Node::Fn(_) => NodeKind::Fn,
            Node::Match(_) => NodeKind::Match,
            Node::Block(_) => NodeKind::Block,
            Node::Exists(_) => NodeKind::Exists,
            Node::Tmpl(_) => NodeKind::Tmpl,
            Node::Str(_) => NodeKind::Str,
            Node::Num(_) => NodeKind::Num,
            Node::Bool(_) => NodeKind::Bool,
            Node::Null(_) => NodeKind::Null,
            Node::Obj(_) => NodeKind::Obj,
            Node::Arr(_) => NodeKind::Arr,
            Node::Not(_) => NodeKind::Not,
            Node::And(_) => NodeKind::And,
            Node::Or(_) => NodeKind::Or,
            Node::Identifier(_) => NodeKind::Identifier,
            Node::Call(_) => NodeKind::Call,
            Node::Index(_) => NodeKind::Index,
            Node::Prop(_) => NodeKind::Prop,
        }
    }

    /// The location recorded by the parser, if any.
    pub fn loc(&self) -> Option<Loc> {
        match self {
            Node::Ns(n) => n.loc,
            Node::Meta(n) => n.loc,
            Node::Def(n) => n.loc,
            Node::Return(n) => n.loc,
            Node::Each(n) => n.loc,
            Node::For(n) => n.loc,
            Node::Loop(n) => n.loc,
            Node::Break(n) => n.loc,
            Node::Continue(n) => n.loc,
            Node::Assign(n) => n.loc,
            Node::If(n) => n.loc,
            Node::Fn(n) => n.loc,
            Node::Match(n) => n.loc,
            Node::Block(n) => n.loc,
            Node::Exists(n) => n.loc,
            Node::Tmpl(n) => n.loc,
            Node::Str(n) => n.loc,
            Node::Num(n) => n.loc,
            Node::Bool(n) => n.loc,
            Node::Null(n) => n.loc,
            Node::Obj(n) => n.loc,
            Node::Arr(n) => n.loc,
            Node::Not(n) => n.loc,
            Node::And(n) | Node::Or(n) => n.loc,
            Node::Identifier(n) => n.loc,
            Node::Call(n) => n.loc,
            Node::Index(n) => n.loc,
            Node::Prop(n) => n.loc,
        }
    }
}

/// `:: Name { members }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    pub members: Vec<Node>,
    pub loc: Option<Loc>,
}

/// `### name value` or `### value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub name: Option<String>,
    pub value: Box<Node>,
    pub loc: Option<Loc>,
}

/// `let`/`var` binding, or a named function written as `@name() {}`.
///
/// For the `@name` form, `expr` is the [`Function`] node and shares this node's
/// location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub name: String,
    pub var_type: Option<TypeSource>,
    pub expr: Box<Node>,
    pub mutable: bool,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Return {
    pub expr: Box<Node>,
    pub loc: Option<Loc>,
}

/// `each let var, items body`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Each {
    pub var: String,
    pub items: Box<Node>,
    pub body: Box<Node>,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct For {
    pub iteration: ForIteration,
    pub body: Box<Node>,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "camelCase")]
pub enum ForIteration {
    /// `for times body`
    Times { times: Box<Node> },
    /// `for let var = from, to body`; `from` may be omitted.
    Range {
        var: String,
        from: Option<Box<Node>>,
        to: Box<Node>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loop {
    pub statements: Vec<Node>,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Break {
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continue {
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    pub op: AssignOp,
    pub dest: Box<Node>,
    pub expr: Box<Node>,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub cond: Box<Node>,
    pub then: Box<Node>,
    pub elseif: Vec<ElseIf>,
    #[serde(rename = "else")]
    pub else_: Option<Box<Node>>,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElseIf {
    pub cond: Node,
    pub then: Node,
}

/// Function literal `@(params): ret { children }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub params: Vec<FnParam>,
    pub ret_type: Option<TypeSource>,
    pub children: Vec<Node>,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FnParam {
    pub name: String,
    pub arg_type: Option<TypeSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub about: Box<Node>,
    pub qs: Vec<MatchArm>,
    pub default: Option<Box<Node>>,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchArm {
    pub q: Node,
    pub a: Node,
}

/// A `{ ... }` branch body or an `eval { ... }` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Node>,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exists {
    pub identifier: Identifier,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tmpl {
    pub tmpl: Vec<TmplElement>,
    pub loc: Option<Loc>,
}

/// A literal text run (escapes already decoded) or an interpolated expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TmplElement {
    Str(String),
    Expr(Node),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Str {
    pub value: String,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Num {
    pub value: f64,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bool {
    pub value: bool,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Null {
    pub loc: Option<Loc>,
}

/// Object literal. Entries keep source order, duplicates included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obj {
    pub entries: Vec<ObjEntry>,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjEntry {
    pub key: String,
    pub value: Node,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arr {
    pub value: Vec<Node>,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Not {
    pub expr: Box<Node>,
    pub loc: Option<Loc>,
}

/// Operands of `&&` / `||`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOperation {
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub loc: Option<Loc>,
}

/// A reference to a (possibly namespaced, `A:b`) name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub loc: Option<Loc>,
}

/// A call, either written `f(args)` or produced by operator sugar.
///
/// For `a + b` the target is `Core:add` located at the `+` token; for
/// `<: x` it is `print` located at `<:`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub target: Box<Node>,
    pub args: Vec<Node>,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub target: Box<Node>,
    pub index: Box<Node>,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    pub target: Box<Node>,
    pub name: String,
    pub loc: Option<Loc>,
}

/// Type annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TypeSource {
    NamedTypeSource(NamedTypeSource),
    FnTypeSource(FnTypeSource),
}

impl TypeSource {
    pub fn kind(&self) -> NodeKind {
        match self {
            TypeSource::NamedTypeSource(_) => NodeKind::NamedTypeSource,
            TypeSource::FnTypeSource(_) => NodeKind::FnTypeSource,
        }
    }

    pub fn loc(&self) -> Option<Loc> {
        match self {
            TypeSource::NamedTypeSource(t) => t.loc,
            TypeSource::FnTypeSource(t) => t.loc,
        }
    }
}

/// `name` or `name<inner>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedTypeSource {
    pub name: String,
    pub inner: Option<Box<TypeSource>>,
    pub loc: Option<Loc>,
}

/// `@(args) => result`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnTypeSource {
    pub args: Vec<TypeSource>,
    pub result: Box<TypeSource>,
    pub loc: Option<Loc>,
}
