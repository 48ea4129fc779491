//! The fixed symbol table.
//!
//! A closed mapping from name to constant or function, expressed as a match
//! so nothing can be registered at runtime. This is the entire vocabulary a
//! bare name or call target may resolve to.

/// What a name in the symbol table denotes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Symbol {
    Constant(f64),
    Func(Func),
}

/// The callable functions. All take one argument except `pow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Sqrt,
    Log,
    Log10,
    Log2,
    Abs,
    Floor,
    Ceil,
    Round,
    Factorial,
    Pow,
}

impl Func {
    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Sinh => "sinh",
            Func::Cosh => "cosh",
            Func::Tanh => "tanh",
            Func::Sqrt => "sqrt",
            Func::Log => "log",
            Func::Log10 => "log10",
            Func::Log2 => "log2",
            Func::Abs => "abs",
            Func::Floor => "floor",
            Func::Ceil => "ceil",
            Func::Round => "round",
            Func::Factorial => "factorial",
            Func::Pow => "pow",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Func::Pow => 2,
            _ => 1,
        }
    }
}

/// Resolve a name. `None` means the name does not exist anywhere in the
/// sandbox — there is no fallback.
pub fn lookup(name: &str) -> Option<Symbol> {
    let symbol = match name {
        "pi" => Symbol::Constant(std::f64::consts::PI),
        "e" => Symbol::Constant(std::f64::consts::E),
        "sin" => Symbol::Func(Func::Sin),
        "cos" => Symbol::Func(Func::Cos),
        "tan" => Symbol::Func(Func::Tan),
        "asin" => Symbol::Func(Func::Asin),
        "acos" => Symbol::Func(Func::Acos),
        "atan" => Symbol::Func(Func::Atan),
        "sinh" => Symbol::Func(Func::Sinh),
        "cosh" => Symbol::Func(Func::Cosh),
        "tanh" => Symbol::Func(Func::Tanh),
        "sqrt" => Symbol::Func(Func::Sqrt),
        "log" => Symbol::Func(Func::Log),
        "log10" => Symbol::Func(Func::Log10),
        "log2" => Symbol::Func(Func::Log2),
        "abs" => Symbol::Func(Func::Abs),
        "floor" => Symbol::Func(Func::Floor),
        "ceil" => Symbol::Func(Func::Ceil),
        "round" => Symbol::Func(Func::Round),
        "factorial" => Symbol::Func(Func::Factorial),
        "pow" => Symbol::Func(Func::Pow),
        _ => return None,
    };
    Some(symbol)
}
