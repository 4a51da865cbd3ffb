//! Content guessing through the public resolver API with the built-in
//! language table.

use language_sniffer::language::{NoSignature, parse_local_variables};
use language_sniffer::{LanguageResolver, SnifferSettings};
use std::collections::BTreeMap;
use std::sync::Arc;

fn assert_guess(resolver: &LanguageResolver, head: &str, tail: &str, expected: &[&str]) {
    let actual = resolver.guess_language_from_contents(head, tail);
    assert_eq!(
        actual, expected,
        "unexpected guess for head {:?} and tail {:?}",
        head, tail
    );
}

fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_perl_shebang() {
    let resolver = LanguageResolver::with_defaults();
    for head in [
        "#!perl",
        "#!perl5 -w",
        "#!/bin/perl",
        "#! /bin/perl -dwh  ",
        "#!/bin/PeRl",
        "#!/bin/myperl",
    ] {
        assert_guess(&resolver, head, "", &["Perl"]);
    }
    for head in ["foo", "#!/bin/erl"] {
        assert_guess(&resolver, head, "", &[]);
    }
}

#[test]
fn test_python_shebang() {
    let resolver = LanguageResolver::with_defaults();
    for head in [
        "#!python",
        "#!python22 -w",
        "#!/bin/python",
        "#! /bin/python -dwh  ",
        "#!/bin/PyThOn",
        "#!/bin/mypython",
    ] {
        assert_guess(&resolver, head, "", &["Python"]);
    }
    for head in ["foo", "#!/bin/ython"] {
        assert_guess(&resolver, head, "", &[]);
    }
}

#[test]
fn test_tcl_shebang() {
    let resolver = LanguageResolver::with_defaults();
    let heads = [
        "#!tclsh",
        "#!tclsh82",
        "#!/bin/tclsh",
        "#!/bin/expect",
        "#! /bin/wish -v  ",
        "#!/bin/TcLSh",
        "#!/bin/mytclsh",
        "#!/bin/sh\n# the next line restarts using tclsh \\\nexec tclsh \"$0\" \"$@\"\n",
        "#!/bin/sh\n# the next line restarts using tclsh \\\nexec wish \"$0\" \"$@\"\n",
        "#!/bin/sh\n# the next line restarts using tclsh \\\nexec expect \"$0\" \"$@\"\n",
    ];
    for head in heads {
        assert_guess(&resolver, head, "", &["Tcl"]);
    }
    for head in ["foo", "#!/bin/clsh"] {
        assert_guess(&resolver, head, "", &[]);
    }
}

#[test]
fn test_exec_wrapper_with_path_before_interpreter() {
    let resolver = LanguageResolver::with_defaults();
    let head = "#!/bin/sh\n# aem \\\nexec $AUTOTEST/bin/wish \"$0\" ${1+\"$@\"} &\n";
    assert_guess(&resolver, head, "", &["Tcl"]);
}

#[test]
fn test_emacs_one_liners() {
    let resolver = LanguageResolver::with_defaults();
    let cases = [
        ("# -*- mode: Tcl -*-", vars(&[("mode", "Tcl")]), vec!["Tcl"]),
        ("# -*- Mode: Tcl -*-", vars(&[("mode", "Tcl")]), vec!["Tcl"]),
        ("# -*- mode: tcl -*-", vars(&[("mode", "tcl")]), vec!["Tcl"]),
        ("# *- mode: Tcl -*- blah blah", vars(&[]), vec![]),
    ];
    for (head, expected_vars, expected_langs) in cases {
        assert_eq!(parse_local_variables(head, "").unwrap(), expected_vars);
        assert_guess(&resolver, head, "", &expected_langs);
    }
}

#[test]
fn test_emacs_local_variable_blocks() {
    let resolver = LanguageResolver::with_defaults();
    let cases = [
        (
            "# Using a prefix and suffix.\n\
             PREFIX Local Variables: SUFFIX\n\
             PREFIX mode: Tcl SUFFIX\n\
             PREFIX End: SUFFIX\n",
            vars(&[("mode", "Tcl")]),
            vec!["Tcl"],
        ),
        (
            "Local Variables:\nmode: Tcl\nEnd:\n",
            vars(&[("mode", "Tcl")]),
            vec!["Tcl"],
        ),
        (
            "# Using a realistic prefix.\n# Local Variables:\n# mode: Tcl\n# End:\n",
            vars(&[("mode", "Tcl")]),
            vec!["Tcl"],
        ),
        (
            "PREFIX Local variables: SUFFIX\n\
             PREFIX foo: End: SUFFIX\n\
             PREFIX tab-width: 4 SUFFIX\n\
             PREFIX End: SUFFIX\n",
            vars(&[("foo", "End:"), ("tab-width", "4")]),
            vec![],
        ),
        (
            "PREFIX Local Variables: SUFFIX\n\
             PREFIX    mode: Tcl\tSUFFIX\n\
             PREFIX End:\n",
            vars(&[("mode", "Tcl")]),
            vec!["Tcl"],
        ),
        (
            "PREFIX Local Variables: SUFFIX\n\
             PREFIX MoDe: tcl SUFFIX\n\
             PREFIX End: SUFFIX\n",
            vars(&[("MoDe", "tcl")]),
            vec![],
        ),
        (
            "\n# ;;; Local Variables: ***\n# ;;; mode: tcl ***\n# ;;; End: ***\n",
            vars(&[("mode", "tcl")]),
            vec!["Tcl"],
        ),
    ];
    for (tail, expected_vars, expected_langs) in cases {
        assert_eq!(parse_local_variables("", tail).unwrap(), expected_vars);
        assert_guess(&resolver, "", tail, &expected_langs);
    }
}

#[test]
fn test_malformed_blocks_yield_no_guess() {
    let resolver = LanguageResolver::with_defaults();
    let tails = [
        // missing prefix
        "PREFIX Local Variables: SUFFIX\n mode: Tcl SUFFIX\nPREFIX End: SUFFIX\n",
        // missing suffix
        "PREFIX Local Variables: SUFFIX\nPREFIX mode: Tcl\nPREFIX End: SUFFIX\n",
    ];
    for tail in tails {
        assert!(parse_local_variables("", tail).is_err());
        let guess = resolver.guess_with_events("", tail);
        assert!(guess.languages.is_empty());
        assert_eq!(guess.events.len(), 1);
    }
}

#[test]
fn test_stray_marker_before_real_block() {
    let resolver = LanguageResolver::with_defaults();
    let tail = "# the Local Variables: section below sets the mode\n\
                puts hi\n\
                # Local Variables:\n\
                # mode: tcl\n\
                # End:\n";
    assert_eq!(parse_local_variables("", tail).unwrap(), vars(&[("mode", "tcl")]));
    assert_guess(&resolver, "", tail, &["Tcl"]);
}

#[test]
fn test_block_beats_one_liner() {
    let resolver = LanguageResolver::with_defaults();
    let tail = "Local Variables:\nmode: Tcl\nEnd:\n";
    assert_guess(&resolver, "# -*- Mode: perl -*-", tail, &["Tcl"]);
}

#[test]
fn test_ambiguous_shebang_reports_every_match() {
    let resolver = LanguageResolver::with_defaults();
    let guess = resolver.guess_with_events("#!/usr/bin/env perl-to-python", "");
    assert!(guess.languages.is_empty());
    assert_eq!(guess.events.len(), 1);
    assert!(guess.events[0].message().contains("'Perl', 'Python'"));
}

#[test]
fn test_markup_detection() {
    let resolver = LanguageResolver::with_defaults();

    assert_guess(&resolver, "<?xml version=\"1.0\"?>\n<root/>", "", &["XML"]);
    assert_guess(
        &resolver,
        "<?xml version=\"1.0\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\"/>",
        "",
        &["SVG", "XML"],
    );
    assert_guess(
        &resolver,
        "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \
         \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n\
         <html xmlns=\"http://www.w3.org/1999/xhtml\">",
        "",
        &["XHTML", "HTML"],
    );
    assert_guess(&resolver, "<!DOCTYPE html>\n<html>", "", &["HTML"]);
}

#[test]
fn test_html5_literal_without_reported_doctype() {
    let resolver =
        LanguageResolver::from_settings(&SnifferSettings::default(), Arc::new(NoSignature));
    assert_guess(&resolver, "<!DOCTYPE html>\n<html>", "", &["HTML5"]);
}
