/// Lexemes of the Rust subset accepted by the syntax check.
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
    // Keywords
    As,
    Const,
    Crate,
    Else,
    False,
    Fn,
    If,
    Let,
    Mod,
    Mut,
    Pub,
    Return,
    SelfValue,
    Super,
    True,
    Use,
    /// A reserved word outside the supported subset (`match`, `struct`, ...).
    Reserved(String),

    // Symbols
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]
    Comma,      // ,
    Colon,      // :
    PathSep,    // ::
    Semicolon,  // ;
    Dot,        // .
    Arrow,      // ->
    FatArrow,   // =>
    Eq,         // =
    EqEq,       // ==
    NotEq,      // !=
    Lt,         // <
    Le,         // <=
    Gt,         // >
    Ge,         // >=
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    Bang,       // !
    Amp,        // &
    AndAnd,     // &&
    Pipe,       // |
    OrOr,       // ||
    Hash,       // #
    Question,   // ?
    Underscore, // _

    // Literals
    Integer { value: u128, suffix: Option<String> },
    Float { value: f64, suffix: Option<String> },
    Str(String),
    Ident(String),

    // End of file
    Eof,
}

/// Strict and reserved keywords the subset does not implement.
const RESERVED: &[&str] = &[
    "abstract", "async", "await", "become", "box", "break", "continue", "do", "dyn", "enum",
    "extern", "final", "for", "impl", "in", "loop", "macro", "match", "move", "override", "priv",
    "ref", "Self", "static", "struct", "trait", "try", "type", "typeof", "unsafe", "unsized",
    "virtual", "where", "while", "yield",
];

impl Lexeme {
    /// Try to match an identifier string to a keyword lexeme.
    pub fn from_keyword(s: &str) -> Option<Lexeme> {
        match s {
            "as" => Some(Lexeme::As),
            "const" => Some(Lexeme::Const),
            "crate" => Some(Lexeme::Crate),
            "else" => Some(Lexeme::Else),
            "false" => Some(Lexeme::False),
            "fn" => Some(Lexeme::Fn),
            "if" => Some(Lexeme::If),
            "let" => Some(Lexeme::Let),
            "mod" => Some(Lexeme::Mod),
            "mut" => Some(Lexeme::Mut),
            "pub" => Some(Lexeme::Pub),
            "return" => Some(Lexeme::Return),
            "self" => Some(Lexeme::SelfValue),
            "super" => Some(Lexeme::Super),
            "true" => Some(Lexeme::True),
            "use" => Some(Lexeme::Use),
            "_" => Some(Lexeme::Underscore),
            _ if RESERVED.contains(&s) => Some(Lexeme::Reserved(s.to_string())),
            _ => None,
        }
    }

    /// True if `s` can never be used as a plain identifier.
    pub fn is_keyword(s: &str) -> bool {
        Self::from_keyword(s).is_some()
    }

    pub fn description(&self) -> String {
        match self {
            Lexeme::As => "'as'".into(),
            Lexeme::Const => "'const'".into(),
            Lexeme::Crate => "'crate'".into(),
            Lexeme::Else => "'else'".into(),
            Lexeme::False => "'false'".into(),
            Lexeme::Fn => "'fn'".into(),
            Lexeme::If => "'if'".into(),
            Lexeme::Let => "'let'".into(),
            Lexeme::Mod => "'mod'".into(),
            Lexeme::Mut => "'mut'".into(),
            Lexeme::Pub => "'pub'".into(),
            Lexeme::Return => "'return'".into(),
            Lexeme::SelfValue => "'self'".into(),
            Lexeme::Super => "'super'".into(),
            Lexeme::True => "'true'".into(),
            Lexeme::Use => "'use'".into(),
            Lexeme::Reserved(word) => format!("reserved word '{}'", word),
            Lexeme::LParen => "'('".into(),
            Lexeme::RParen => "')'".into(),
            Lexeme::LBrace => "'{'".into(),
            Lexeme::RBrace => "'}'".into(),
            Lexeme::LBracket => "'['".into(),
            Lexeme::RBracket => "']'".into(),
            Lexeme::Comma => "','".into(),
            Lexeme::Colon => "':'".into(),
            Lexeme::PathSep => "'::'".into(),
            Lexeme::Semicolon => "';'".into(),
            Lexeme::Dot => "'.'".into(),
            Lexeme::Arrow => "'->'".into(),
            Lexeme::FatArrow => "'=>'".into(),
            Lexeme::Eq => "'='".into(),
            Lexeme::EqEq => "'=='".into(),
            Lexeme::NotEq => "'!='".into(),
            Lexeme::Lt => "'<'".into(),
            Lexeme::Le => "'<='".into(),
            Lexeme::Gt => "'>'".into(),
            Lexeme::Ge => "'>='".into(),
            Lexeme::Plus => "'+'".into(),
            Lexeme::Minus => "'-'".into(),
            Lexeme::Star => "'*'".into(),
            Lexeme::Slash => "'/'".into(),
            Lexeme::Percent => "'%'".into(),
            Lexeme::PlusEq => "'+='".into(),
            Lexeme::MinusEq => "'-='".into(),
            Lexeme::StarEq => "'*='".into(),
            Lexeme::SlashEq => "'/='".into(),
            Lexeme::Bang => "'!'".into(),
            Lexeme::Amp => "'&'".into(),
            Lexeme::AndAnd => "'&&'".into(),
            Lexeme::Pipe => "'|'".into(),
            Lexeme::OrOr => "'||'".into(),
            Lexeme::Hash => "'#'".into(),
            Lexeme::Question => "'?'".into(),
            Lexeme::Underscore => "'_'".into(),
            Lexeme::Integer { .. } => "integer literal".into(),
            Lexeme::Float { .. } => "float literal".into(),
            Lexeme::Str(_) => "string literal".into(),
            Lexeme::Ident(_) => "identifier".into(),
            Lexeme::Eof => "end of file".into(),
        }
    }
}
