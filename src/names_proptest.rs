//! Property-based tests for layout name parsing.
//!
//! These tests use proptest to generate random org specs and verify that the
//! decoding rules hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::names::OrgSpec;
    use proptest::prelude::*;

    proptest! {
        /// Property: a spec without pipes names directory, origin and upstream alike
        #[test]
        fn org_spec_without_pipe_is_uniform(s in "[^|]*") {
            let names = OrgSpec(s.clone()).parse();
            prop_assert_eq!(&names.directory, &s);
            prop_assert_eq!(&names.origin, &s);
            prop_assert_eq!(&names.upstream, &s);
        }

        /// Property: `a|b` means upstream is the origin
        #[test]
        fn org_spec_two_segments(a in "[^|]*", b in "[^|]*") {
            let names = OrgSpec(format!("{}|{}", a, b)).parse();
            prop_assert_eq!(names.directory, a);
            prop_assert_eq!(&names.origin, &b);
            prop_assert_eq!(&names.upstream, &b);
        }

        /// Property: `a|b|c[|...]` takes the first three segments
        #[test]
        fn org_spec_three_or_more_segments(
            a in "[^|]*",
            b in "[^|]*",
            c in "[^|]*",
            rest in proptest::collection::vec("[^|]*", 0..3),
        ) {
            let mut spec = format!("{}|{}|{}", a, b, c);
            for extra in &rest {
                spec.push('|');
                spec.push_str(extra);
            }
            let names = OrgSpec(spec).parse();
            prop_assert_eq!(names.directory, a);
            prop_assert_eq!(names.origin, b);
            prop_assert_eq!(names.upstream, c);
        }

        /// Property: the directory never contains a pipe
        #[test]
        fn org_spec_directory_has_no_pipe(s in ".*") {
            let names = OrgSpec(s).parse();
            prop_assert!(!names.directory.contains('|'));
        }
    }
}
