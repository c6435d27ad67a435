use crate::formula::Formula;
use minisat::*;

/// Translates formulas into a minisat session. Nested connectives get
/// Tseitin literals; top-level connectives become clauses directly.
pub struct Encoder<'a> {
    solver: &'a mut Solver,
    lits: &'a [Bool],
}

impl<'a> Encoder<'a> {
    pub fn new(solver: &'a mut Solver, lits: &'a [Bool]) -> Self {
        Encoder { solver, lits }
    }

    pub fn literal(&mut self, f: &Formula) -> Bool {
        match f {
            Formula::Const(true) => self.solver.and_literal(Vec::<Bool>::new()),
            Formula::Const(false) => self.solver.or_literal(Vec::<Bool>::new()),
            Formula::Var(v) => self.lits[v.0],
            Formula::Not(x) => !self.literal(x),
            Formula::And(xs) => {
                let xs = xs.iter().map(|x| self.literal(x)).collect::<Vec<_>>();
                self.solver.and_literal(xs)
            }
            Formula::Or(xs) => {
                let xs = xs.iter().map(|x| self.literal(x)).collect::<Vec<_>>();
                self.solver.or_literal(xs)
            }
            Formula::Implies(a, b) => {
                let a = self.literal(a);
                let b = self.literal(b);
                self.solver.or_literal(vec![!a, b])
            }
        }
    }

    pub fn assert(&mut self, f: &Formula) {
        match f {
            Formula::Const(true) => {}
            Formula::And(xs) => {
                for x in xs {
                    self.assert(x);
                }
            }
            Formula::Or(xs) => {
                let clause = xs.iter().map(|x| self.literal(x)).collect::<Vec<_>>();
                self.solver.add_clause(clause);
            }
            Formula::Not(x) => match &**x {
                Formula::And(xs) => {
                    let clause = xs.iter().map(|x| !self.literal(x)).collect::<Vec<_>>();
                    self.solver.add_clause(clause);
                }
                _ => {
                    let l = self.literal(f);
                    self.solver.add_clause(vec![l]);
                }
            },
            Formula::Implies(a, b) => {
                let mut clause = match &**a {
                    Formula::And(xs) => xs.iter().map(|x| !self.literal(x)).collect::<Vec<_>>(),
                    a => vec![!self.literal(a)],
                };
                match &**b {
                    Formula::Or(ys) => clause.extend(ys.iter().map(|y| self.literal(y))),
                    b => clause.push(self.literal(b)),
                }
                self.solver.add_clause(clause);
            }
            _ => {
                let l = self.literal(f);
                self.solver.add_clause(vec![l]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Var;

    fn models(formulas: &[Formula], n: usize) -> Vec<Vec<bool>> {
        // Enumerate all satisfying assignments by blocking each one found.
        let mut solver = Solver::new();
        let lits = (0..n).map(|_| solver.new_lit()).collect::<Vec<Bool>>();
        {
            let mut encoder = Encoder::new(&mut solver, &lits);
            for f in formulas {
                encoder.assert(f);
            }
        }
        let mut found = Vec::new();
        loop {
            let values = match solver.solve_under_assumptions(Vec::new()) {
                Ok(model) => lits.iter().map(|l| model.value(l)).collect::<Vec<bool>>(),
                Err(()) => break,
            };
            solver.add_clause(
                lits.iter()
                    .zip(values.iter())
                    .map(|(l, v)| if *v { !*l } else { *l }),
            );
            found.push(values);
        }
        found.sort();
        found
    }

    fn truth_table(formulas: &[Formula], n: usize) -> Vec<Vec<bool>> {
        let mut out = Vec::new();
        for bits in 0..(1usize << n) {
            let values = (0..n).map(|i| bits & (1 << i) != 0).collect::<Vec<bool>>();
            if formulas.iter().all(|f| f.eval(&values)) {
                out.push(values);
            }
        }
        out.sort();
        out
    }

    #[test]
    fn encoding_agrees_with_eval() {
        let v = |i| Formula::Var(Var(i));
        let cases = vec![
            vec![Formula::implies(
                Formula::and(vec![v(0), v(1)]),
                Formula::or(vec![v(2), !v(0)]),
            )],
            vec![!Formula::and(vec![v(0), v(1)]), Formula::or(vec![v(0), v(1)])],
            vec![Formula::or(vec![
                Formula::and(vec![v(0), !v(1), v(2)]),
                Formula::and(vec![!v(0), !v(1), !v(2)]),
            ])],
            vec![Formula::implies(v(0), Formula::or(vec![]))],
            vec![!Formula::or(vec![v(1), Formula::implies(v(0), v(2))])],
        ];
        for formulas in &cases {
            assert_eq!(models(formulas, 3), truth_table(formulas, 3));
        }
    }

    #[test]
    fn constants() {
        assert_eq!(models(&[Formula::Const(true)], 1).len(), 2);
        assert!(models(&[Formula::Const(false)], 1).is_empty());
        assert!(models(&[Formula::and(vec![Formula::Var(Var(0)), Formula::Const(false)])], 1).is_empty());
    }
}
