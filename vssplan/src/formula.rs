use std::fmt;
use std::ops::Not;

/// Dense index of a decision variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(pub usize);

/// Solver-independent boolean formula over decision variables.
#[derive(Clone, Debug, PartialEq)]
pub enum Formula {
    Const(bool),
    Var(Var),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Implies(Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn and<I: IntoIterator<Item = Formula>>(xs: I) -> Formula {
        Formula::And(xs.into_iter().collect())
    }

    pub fn or<I: IntoIterator<Item = Formula>>(xs: I) -> Formula {
        Formula::Or(xs.into_iter().collect())
    }

    pub fn implies(a: Formula, b: Formula) -> Formula {
        Formula::Implies(Box::new(a), Box::new(b))
    }

    pub fn eval(&self, values: &[bool]) -> bool {
        match self {
            Formula::Const(b) => *b,
            Formula::Var(v) => values[v.0],
            Formula::Not(x) => !x.eval(values),
            Formula::And(xs) => xs.iter().all(|x| x.eval(values)),
            Formula::Or(xs) => xs.iter().any(|x| x.eval(values)),
            Formula::Implies(a, b) => !a.eval(values) || b.eval(values),
        }
    }

    /// Variables mentioned in the formula, in order of appearance.
    pub fn vars(&self) -> Vec<Var> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars(&self, out: &mut Vec<Var>) {
        match self {
            Formula::Const(_) => {}
            Formula::Var(v) => out.push(*v),
            Formula::Not(x) => x.collect_vars(out),
            Formula::And(xs) | Formula::Or(xs) => xs.iter().for_each(|x| x.collect_vars(out)),
            Formula::Implies(a, b) => {
                a.collect_vars(out);
                b.collect_vars(out);
            }
        }
    }
}

impl From<Var> for Formula {
    fn from(v: Var) -> Formula {
        Formula::Var(v)
    }
}

impl Not for Formula {
    type Output = Formula;
    fn not(self) -> Formula {
        match self {
            Formula::Not(x) => *x,
            Formula::Const(b) => Formula::Const(!b),
            x => Formula::Not(Box::new(x)),
        }
    }
}

impl Not for Var {
    type Output = Formula;
    fn not(self) -> Formula {
        Formula::Not(Box::new(Formula::Var(self)))
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn list(f: &mut fmt::Formatter, op: &str, xs: &[Formula]) -> fmt::Result {
            write!(f, "({}", op)?;
            for x in xs {
                write!(f, " {}", x)?;
            }
            write!(f, ")")
        }
        match self {
            Formula::Const(b) => write!(f, "{}", b),
            Formula::Var(v) => write!(f, "v{}", v.0),
            Formula::Not(x) => write!(f, "(not {})", x),
            Formula::And(xs) => list(f, "and", xs),
            Formula::Or(xs) => list(f, "or", xs),
            Formula::Implies(a, b) => write!(f, "(=> {} {})", a, b),
        }
    }
}
