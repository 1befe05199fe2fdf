//! Propositional logic over ground atoms.
//!
//! A `Formula` is evaluated against a `PossibleWorld` (a complete truth assignment to the
//! `WorldVariables`) and can be expanded into an equivalent set of `Clause`s (conjunctive normal
//! form). Weighted formulas and their clauses are collected in a `WeightedClausalKb`.

use std::fmt;

mod kb;
mod world;

pub use self::kb::{WeightedClausalKb, WeightedClause, WeightedFormula};
pub use self::world::{Database, GroundAtom, PossibleWorld, WorldVariables};


/// A possibly negated ground atom
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Literal {

    /// The index of the ground atom
    pub atom: usize,

    /// `false` if the atom is negated
    pub positive: bool

}

impl Literal {

    pub fn pos(atom: usize) -> Self {
        Literal { atom, positive: true }
    }

    pub fn neg(atom: usize) -> Self {
        Literal { atom, positive: false }
    }

    /// The complementary literal
    pub fn negate(&self) -> Self {
        Literal { atom: self.atom, positive: !self.positive }
    }

    pub fn is_true(&self, world: &PossibleWorld) -> bool {
        world.is_true(self.atom) == self.positive
    }

}

impl fmt::Display for Literal {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.atom)
        } else {
            write!(f, "!{}", self.atom)
        }
    }

}


/// A disjunction of `Literal`s. The empty clause is unsatisfiable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Clause {
    literals: Vec<Literal>
}

impl Clause {

    /// Construct a new `Clause`. Duplicate literals are removed.
    pub fn new(literals: Vec<Literal>) -> Self {
        let mut unique: Vec<Literal> = Vec::with_capacity(literals.len());
        for l in literals {
            if !unique.contains(&l) {
                unique.push(l);
            }
        }

        Clause { literals: unique }
    }

    /// The empty (unsatisfiable) clause
    pub fn empty() -> Self {
        Clause { literals: Vec::new() }
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// A clause containing both an atom and its negation is true in every world
    pub fn is_tautology(&self) -> bool {
        self.literals.iter().any(|l| self.literals.contains(&l.negate()))
    }

    pub fn is_true(&self, world: &PossibleWorld) -> bool {
        self.literals.iter().any(|l| l.is_true(world))
    }

    /// The disjunction of two clauses
    fn merge(&self, other: &Clause) -> Clause {
        Clause::new(self.literals.iter().chain(other.literals.iter()).cloned().collect())
    }

}

impl fmt::Display for Clause {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "False");
        }

        let parts: Vec<String> = self.literals.iter().map(|l| l.to_string()).collect();
        write!(f, "{}", parts.join(" v "))
    }

}


/// A propositional formula over ground atom indices
#[derive(Clone, Debug, PartialEq)]
pub enum Formula {
    True,
    False,
    Atom(usize),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Equiv(Box<Formula>, Box<Formula>)
}

impl Formula {

    pub fn atom(index: usize) -> Self {
        Formula::Atom(index)
    }

    pub fn not(f: Formula) -> Self {
        Formula::Not(Box::new(f))
    }

    pub fn and(fs: Vec<Formula>) -> Self {
        Formula::And(fs)
    }

    pub fn or(fs: Vec<Formula>) -> Self {
        Formula::Or(fs)
    }

    pub fn implies(antecedent: Formula, consequent: Formula) -> Self {
        Formula::Implies(Box::new(antecedent), Box::new(consequent))
    }

    pub fn equiv(a: Formula, b: Formula) -> Self {
        Formula::Equiv(Box::new(a), Box::new(b))
    }


    /// Evaluate the `Formula` in the given world
    pub fn is_true(&self, world: &PossibleWorld) -> bool {
        match self {
            Formula::True => true,
            Formula::False => false,
            Formula::Atom(i) => world.is_true(*i),
            Formula::Not(f) => !f.is_true(world),
            Formula::And(fs) => fs.iter().all(|f| f.is_true(world)),
            Formula::Or(fs) => fs.iter().any(|f| f.is_true(world)),
            Formula::Implies(a, b) => !a.is_true(world) || b.is_true(world),
            Formula::Equiv(a, b) => a.is_true(world) == b.is_true(world)
        }
    }


    /// The indices of all atoms that occur in the `Formula`, in order of first occurrence
    pub fn atoms(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_atoms(&mut out);
        out
    }

    fn collect_atoms(&self, out: &mut Vec<usize>) {
        match self {
            Formula::True | Formula::False => (),
            Formula::Atom(i) => {
                if !out.contains(i) {
                    out.push(*i);
                }
            },
            Formula::Not(f) => f.collect_atoms(out),
            Formula::And(fs) | Formula::Or(fs) => {
                for f in fs.iter() {
                    f.collect_atoms(out);
                }
            },
            Formula::Implies(a, b) | Formula::Equiv(a, b) => {
                a.collect_atoms(out);
                b.collect_atoms(out);
            }
        }
    }


    /// Convert the `Formula` into an equivalent conjunction of `Clause`s.
    ///
    /// The conversion pushes negations to the atoms and then distributes disjunctions over
    /// conjunctions, so the result may be exponentially larger than the input. Tautological clauses
    /// are dropped: a valid formula yields no clauses, an unsatisfiable one yields the empty clause.
    pub fn to_cnf(&self) -> Vec<Clause> {
        let mut clauses: Vec<Clause> = Vec::new();
        for c in cnf(self, false) {
            if !c.is_tautology() && !clauses.contains(&c) {
                clauses.push(c);
            }
        }
        clauses
    }

}


/// CNF of `f` (or of its negation, if `negated`)
fn cnf(f: &Formula, negated: bool) -> Vec<Clause> {
    match (f, negated) {
        (Formula::True, false) | (Formula::False, true) => vec![],
        (Formula::False, false) | (Formula::True, true) => vec![Clause::empty()],
        (Formula::Atom(i), _) => vec![Clause::new(vec![Literal { atom: *i, positive: !negated }])],
        (Formula::Not(g), _) => cnf(g, !negated),

        (Formula::And(fs), false) => conjunction(fs.iter().map(|g| cnf(g, false))),
        (Formula::Or(fs), true) => conjunction(fs.iter().map(|g| cnf(g, true))),
        (Formula::Or(fs), false) => disjunction(fs.iter().map(|g| cnf(g, false))),
        (Formula::And(fs), true) => disjunction(fs.iter().map(|g| cnf(g, true))),

        // a => b  ==  !a v b;  !(a => b)  ==  a ^ !b
        (Formula::Implies(a, b), false) => disjunction(vec![cnf(a, true), cnf(b, false)].into_iter()),
        (Formula::Implies(a, b), true) => conjunction(vec![cnf(a, false), cnf(b, true)].into_iter()),

        // a <=> b  ==  (!a v b) ^ (a v !b);  !(a <=> b)  ==  (a v b) ^ (!a v !b)
        (Formula::Equiv(a, b), false) => conjunction(vec![
            disjunction(vec![cnf(a, true), cnf(b, false)].into_iter()),
            disjunction(vec![cnf(a, false), cnf(b, true)].into_iter())
        ].into_iter()),
        (Formula::Equiv(a, b), true) => conjunction(vec![
            disjunction(vec![cnf(a, false), cnf(b, false)].into_iter()),
            disjunction(vec![cnf(a, true), cnf(b, true)].into_iter())
        ].into_iter())
    }
}

fn conjunction<I: Iterator<Item = Vec<Clause>>>(parts: I) -> Vec<Clause> {
    parts.flatten().collect()
}

fn disjunction<I: Iterator<Item = Vec<Clause>>>(parts: I) -> Vec<Clause> {
    // the empty disjunction is false
    let mut acc = vec![Clause::empty()];

    for part in parts {
        let mut next = Vec::with_capacity(acc.len() * part.len());
        for a in acc.iter() {
            for b in part.iter() {
                next.push(a.merge(b));
            }
        }
        acc = next;
    }

    acc
}

impl fmt::Display for Formula {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn join(f: &mut fmt::Formatter, fs: &[Formula], op: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, g) in fs.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", op)?;
                }
                write!(f, "{}", g)?;
            }
            write!(f, ")")
        }

        match self {
            Formula::True => write!(f, "True"),
            Formula::False => write!(f, "False"),
            Formula::Atom(i) => write!(f, "{}", i),
            Formula::Not(g) => write!(f, "!{}", g),
            Formula::And(fs) => join(f, fs, "^"),
            Formula::Or(fs) => join(f, fs, "v"),
            Formula::Implies(a, b) => write!(f, "({} => {})", a, b),
            Formula::Equiv(a, b) => write!(f, "({} <=> {})", a, b)
        }
    }

}
