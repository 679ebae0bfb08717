//! Composable query predicates ("specifications") over an entity type.
//!
//! A [`Specification`] is a tagged tree: caller-defined leaves ([`Criterion`])
//! combined with `And`, `Or` and `Not`. The same tree is walked by two pure
//! functions:
//!
//! - [`Specification::is_satisfied_by`] evaluates it in-process against one value;
//! - [`Specification::to_query_predicate`] translates it into a [`QueryPredicate`]
//!   a persistence layer can push down to storage.
//!
//! Both paths must agree on every input. Each [`Criterion`] is responsible for
//! that agreement at the leaf level; the combinators preserve it.

pub mod query;

use std::sync::Arc;

pub use query::{CompareOp, FieldValue, QueryPredicate, Record, SqlFilter, sql_identifier};

/// A caller-defined leaf condition over `T`.
///
/// Implementations must be pure: `is_satisfied_by` may not have side effects,
/// and `to_predicate` must describe exactly the same condition in terms of the
/// columns a [`Record`] view of `T` exposes.
pub trait Criterion<T>: core::fmt::Debug + Send + Sync {
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    fn to_predicate(&self) -> QueryPredicate;

    /// Short human-readable form, used by [`Specification::describe`].
    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

/// Constant leaf: matches everything or nothing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Always(pub bool);

impl<T> Criterion<T> for Always {
    fn is_satisfied_by(&self, _candidate: &T) -> bool {
        self.0
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::constant(self.0)
    }

    fn describe(&self) -> String {
        if self.0 { "TRUE".into() } else { "FALSE".into() }
    }
}

/// Boolean predicate tree over `T`.
///
/// Composite nodes own their children. Leaves are immutable and held behind an
/// `Arc`, so cloning a specification (e.g. to combine it with itself) is cheap.
pub enum Specification<T> {
    Leaf(Arc<dyn Criterion<T>>),
    And(Box<Specification<T>>, Box<Specification<T>>),
    Or(Box<Specification<T>>, Box<Specification<T>>),
    Not(Box<Specification<T>>),
}

impl<T> Specification<T> {
    pub fn leaf<C>(criterion: C) -> Self
    where
        C: Criterion<T> + 'static,
    {
        Specification::Leaf(Arc::new(criterion))
    }

    pub fn from_shared(criterion: Arc<dyn Criterion<T>>) -> Self {
        Specification::Leaf(criterion)
    }

    pub fn always(value: bool) -> Self {
        Specification::leaf(Always(value))
    }

    pub fn and(self, other: Specification<T>) -> Self {
        Specification::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Specification<T>) -> Self {
        Specification::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Specification::Not(Box::new(self))
    }

    /// Conjunction of all `specs`; an empty input matches everything.
    pub fn all_of(specs: impl IntoIterator<Item = Specification<T>>) -> Self {
        specs
            .into_iter()
            .reduce(Specification::and)
            .unwrap_or_else(|| Specification::always(true))
    }

    /// Disjunction of all `specs`; an empty input matches nothing.
    pub fn any_of(specs: impl IntoIterator<Item = Specification<T>>) -> Self {
        specs
            .into_iter()
            .reduce(Specification::or)
            .unwrap_or_else(|| Specification::always(false))
    }

    pub fn is_satisfied_by(&self, candidate: &T) -> bool {
        match self {
            Specification::Leaf(criterion) => criterion.is_satisfied_by(candidate),
            Specification::And(left, right) => {
                left.is_satisfied_by(candidate) && right.is_satisfied_by(candidate)
            }
            Specification::Or(left, right) => {
                left.is_satisfied_by(candidate) || right.is_satisfied_by(candidate)
            }
            Specification::Not(inner) => !inner.is_satisfied_by(candidate),
        }
    }

    pub fn to_query_predicate(&self) -> QueryPredicate {
        match self {
            Specification::Leaf(criterion) => criterion.to_predicate(),
            Specification::And(left, right) => {
                left.to_query_predicate().and(right.to_query_predicate())
            }
            Specification::Or(left, right) => {
                left.to_query_predicate().or(right.to_query_predicate())
            }
            Specification::Not(inner) => inner.to_query_predicate().negate(),
        }
    }

    /// Keep the candidates that satisfy this specification.
    pub fn filter<'a>(&self, candidates: impl IntoIterator<Item = &'a T>) -> Vec<&'a T>
    where
        T: 'a,
    {
        candidates
            .into_iter()
            .filter(|c| self.is_satisfied_by(c))
            .collect()
    }

    pub fn describe(&self) -> String {
        match self {
            Specification::Leaf(criterion) => criterion.describe(),
            Specification::And(left, right) => {
                format!("({} AND {})", left.describe(), right.describe())
            }
            Specification::Or(left, right) => {
                format!("({} OR {})", left.describe(), right.describe())
            }
            Specification::Not(inner) => format!("NOT {}", inner.describe()),
        }
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Specification::Leaf(_) => 1,
            Specification::And(left, right) | Specification::Or(left, right) => {
                left.leaf_count() + right.leaf_count()
            }
            Specification::Not(inner) => inner.leaf_count(),
        }
    }
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        match self {
            Specification::Leaf(criterion) => Specification::Leaf(Arc::clone(criterion)),
            Specification::And(left, right) => Specification::And(left.clone(), right.clone()),
            Specification::Or(left, right) => Specification::Or(left.clone(), right.clone()),
            Specification::Not(inner) => Specification::Not(inner.clone()),
        }
    }
}

impl<T> core::fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Specification::Leaf(criterion) => f.debug_tuple("Leaf").field(criterion).finish(),
            Specification::And(left, right) => f.debug_tuple("And").field(left).field(right).finish(),
            Specification::Or(left, right) => f.debug_tuple("Or").field(left).field(right).finish(),
            Specification::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
        }
    }
}

impl<T> core::ops::BitAnd for Specification<T> {
    type Output = Specification<T>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl<T> core::ops::BitOr for Specification<T> {
    type Output = Specification<T>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl<T> core::ops::Not for Specification<T> {
    type Output = Specification<T>;

    fn not(self) -> Self::Output {
        Specification::Not(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[derive(Debug, Clone)]
    struct Item {
        price: Decimal,
        featured: bool,
        stock: i64,
    }

    impl Record for Item {
        fn field(&self, name: &str) -> FieldValue {
            match name {
                "price" => self.price.into(),
                "featured" => self.featured.into(),
                "stock" => self.stock.into(),
                _ => FieldValue::Null,
            }
        }
    }

    #[derive(Debug)]
    struct PriceAtMost(Decimal);

    impl Criterion<Item> for PriceAtMost {
        fn is_satisfied_by(&self, item: &Item) -> bool {
            item.price <= self.0
        }

        fn to_predicate(&self) -> QueryPredicate {
            QueryPredicate::le("price", self.0)
        }

        fn describe(&self) -> String {
            format!("price <= {}", self.0)
        }
    }

    #[derive(Debug)]
    struct Featured;

    impl Criterion<Item> for Featured {
        fn is_satisfied_by(&self, item: &Item) -> bool {
            item.featured
        }

        fn to_predicate(&self) -> QueryPredicate {
            QueryPredicate::eq("featured", true)
        }
    }

    #[derive(Debug)]
    struct InStock;

    impl Criterion<Item> for InStock {
        fn is_satisfied_by(&self, item: &Item) -> bool {
            item.stock > 0
        }

        fn to_predicate(&self) -> QueryPredicate {
            QueryPredicate::gt("stock", 0i64)
        }
    }

    fn item(price: Decimal, featured: bool, stock: i64) -> Item {
        Item { price, featured, stock }
    }

    #[test]
    fn and_or_not_follow_boolean_semantics() {
        let cheap = || Specification::leaf(PriceAtMost(dec!(10)));
        let featured = || Specification::leaf(Featured);

        let x = item(dec!(5), false, 1);
        assert!(!cheap().and(featured()).is_satisfied_by(&x));
        assert!(cheap().or(featured()).is_satisfied_by(&x));
        assert!(!cheap().not().is_satisfied_by(&x));
        assert!(featured().not().is_satisfied_by(&x));
    }

    #[test]
    fn double_negation_is_identity() {
        let spec = Specification::leaf(Featured);
        let twice = spec.clone().not().not();
        for x in [item(dec!(1), true, 0), item(dec!(1), false, 0)] {
            assert_eq!(twice.is_satisfied_by(&x), spec.is_satisfied_by(&x));
        }
    }

    #[test]
    fn composing_with_itself_terminates() {
        let spec = Specification::leaf(InStock);
        let doubled = spec.clone().and(spec.clone()).or(spec);
        assert_eq!(doubled.leaf_count(), 3);
        assert!(doubled.is_satisfied_by(&item(dec!(1), false, 2)));
        assert!(!doubled.is_satisfied_by(&item(dec!(1), false, 0)));
    }

    #[test]
    fn operator_sugar_matches_methods() {
        let spec = Specification::leaf(Featured) & !Specification::leaf(InStock)
            | Specification::leaf(PriceAtMost(dec!(2)));
        assert!(spec.is_satisfied_by(&item(dec!(9), true, 0)));
        assert!(spec.is_satisfied_by(&item(dec!(1), false, 5)));
        assert!(!spec.is_satisfied_by(&item(dec!(9), true, 5)));
    }

    #[test]
    fn empty_folds() {
        let x = item(dec!(1), false, 0);
        assert!(Specification::<Item>::all_of(vec![]).is_satisfied_by(&x));
        assert!(!Specification::<Item>::any_of(vec![]).is_satisfied_by(&x));
        assert_eq!(
            Specification::<Item>::all_of(vec![]).to_query_predicate(),
            QueryPredicate::constant(true)
        );
    }

    #[test]
    fn folds_combine_every_operand() {
        let all = Specification::all_of([
            Specification::leaf(Featured),
            Specification::leaf(InStock),
            Specification::leaf(PriceAtMost(dec!(10))),
        ]);
        assert!(all.is_satisfied_by(&item(dec!(10), true, 1)));
        assert!(!all.is_satisfied_by(&item(dec!(11), true, 1)));

        let any = Specification::any_of([Specification::leaf(Featured), Specification::leaf(InStock)]);
        assert!(any.is_satisfied_by(&item(dec!(100), false, 1)));
        assert!(!any.is_satisfied_by(&item(dec!(100), false, 0)));
    }

    #[test]
    fn filter_keeps_matching_candidates() {
        let items = vec![
            item(dec!(5), true, 1),
            item(dec!(50), true, 1),
            item(dec!(5), false, 0),
        ];
        let spec = Specification::leaf(PriceAtMost(dec!(10))).and(Specification::leaf(InStock));
        let kept = spec.filter(&items);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].price, dec!(5));
    }

    #[test]
    fn translation_mirrors_tree_shape() {
        let spec = Specification::leaf(PriceAtMost(dec!(10))).and(Specification::leaf(Featured).not());
        assert_eq!(
            spec.to_query_predicate(),
            QueryPredicate::le("price", dec!(10)).and(QueryPredicate::eq("featured", true).negate())
        );
        assert_eq!(spec.describe(), "(price <= 10 AND NOT Featured)");
    }

    #[test]
    fn specifications_are_shareable_across_threads() {
        let spec = Arc::new(Specification::leaf(InStock).or(Specification::leaf(Featured)));
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let spec = Arc::clone(&spec);
                std::thread::spawn(move || spec.is_satisfied_by(&item(dec!(1), false, n)))
            })
            .collect();
        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![false, true, true, true]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Shape {
            Cheap(i64),
            Featured,
            InStock,
            And(Box<Shape>, Box<Shape>),
            Or(Box<Shape>, Box<Shape>),
            Not(Box<Shape>),
        }

        fn build(shape: &Shape) -> Specification<Item> {
            match shape {
                Shape::Cheap(limit) => Specification::leaf(PriceAtMost(Decimal::from(*limit))),
                Shape::Featured => Specification::leaf(Featured),
                Shape::InStock => Specification::leaf(InStock),
                Shape::And(l, r) => build(l).and(build(r)),
                Shape::Or(l, r) => build(l).or(build(r)),
                Shape::Not(inner) => build(inner).not(),
            }
        }

        fn shape() -> impl Strategy<Value = Shape> {
            let leaf = prop_oneof![
                (0i64..100).prop_map(Shape::Cheap),
                Just(Shape::Featured),
                Just(Shape::InStock),
            ];
            leaf.prop_recursive(5, 32, 2, |inner| {
                prop_oneof![
                    (inner.clone(), inner.clone())
                        .prop_map(|(l, r)| Shape::And(Box::new(l), Box::new(r))),
                    (inner.clone(), inner.clone())
                        .prop_map(|(l, r)| Shape::Or(Box::new(l), Box::new(r))),
                    inner.prop_map(|s| Shape::Not(Box::new(s))),
                ]
            })
        }

        fn any_item() -> impl Strategy<Value = Item> {
            (0i64..10_000, any::<bool>(), -5i64..5)
                .prop_map(|(cents, featured, stock)| item(Decimal::new(cents, 2), featured, stock))
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            #[test]
            fn in_memory_and_translated_paths_agree(s in shape(), x in any_item()) {
                let spec = build(&s);
                let predicate = spec.to_query_predicate();
                prop_assert_eq!(spec.is_satisfied_by(&x), predicate.evaluate(&x));
                prop_assert_eq!(spec.is_satisfied_by(&x), predicate.simplify().evaluate(&x));
            }

            #[test]
            fn double_negation_law(s in shape(), x in any_item()) {
                let spec = build(&s);
                prop_assert_eq!(spec.clone().not().not().is_satisfied_by(&x), spec.is_satisfied_by(&x));
            }

            #[test]
            fn and_or_truth_tables(a in shape(), b in shape(), x in any_item()) {
                let (sa, sb) = (build(&a), build(&b));
                let (va, vb) = (sa.is_satisfied_by(&x), sb.is_satisfied_by(&x));
                prop_assert_eq!(sa.clone().and(sb.clone()).is_satisfied_by(&x), va && vb);
                prop_assert_eq!(sa.or(sb).is_satisfied_by(&x), va || vb);
            }
        }
    }
}
