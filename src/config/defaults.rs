//! Built-in language table and factory file associations.
//!
//! Hosts that ship their own language providers can turn the table off with
//! `include_builtin_languages = false`.

use crate::language::LanguageSpec;
use std::collections::BTreeMap;

const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

fn spec(name: &str) -> LanguageSpec {
    LanguageSpec {
        name: name.to_string(),
        ..Default::default()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Returns the built-in language definitions, in registration order.
pub fn builtin_languages() -> Vec<LanguageSpec> {
    vec![
        LanguageSpec {
            default_extension: Some(".txt".to_string()),
            mode_names: strings(&["text", "fundamental"]),
            access_key: Some("t".to_string()),
            ..spec("Text")
        },
        LanguageSpec {
            mode_names: strings(&["perl", "cperl"]),
            default_extension: Some(".pl".to_string()),
            shebang_patterns: strings(&[r"(?im)#!.*perl.*$"]),
            primary: true,
            access_key: Some("p".to_string()),
            ..spec("Perl")
        },
        LanguageSpec {
            mode_names: strings(&["python"]),
            default_extension: Some(".py".to_string()),
            shebang_patterns: strings(&[r"(?im)#!.*python.*$"]),
            primary: true,
            access_key: Some("y".to_string()),
            ..spec("Python")
        },
        LanguageSpec {
            mode_names: strings(&["tcl"]),
            default_extension: Some(".tcl".to_string()),
            shebang_patterns: strings(&[
                r"(?im)#!.*(tclsh|wish|expect).*$",
                // #!/bin/sh + `exec tclsh "$0" "$@"` re-exec wrapper
                r"(?ims)#!.*^exec [^\r\n]*?(tclsh|wish|expect)",
            ]),
            primary: true,
            access_key: Some("c".to_string()),
            ..spec("Tcl")
        },
        LanguageSpec {
            mode_names: strings(&["ruby"]),
            default_extension: Some(".rb".to_string()),
            shebang_patterns: strings(&[r"(?im)#!.*ruby.*$"]),
            primary: true,
            access_key: Some("r".to_string()),
            ..spec("Ruby")
        },
        LanguageSpec {
            mode_names: strings(&["sh", "shell-script", "bash"]),
            default_extension: Some(".sh".to_string()),
            shebang_patterns: strings(&[r"(?im)#!.*\b(?:ba|z)sh\b.*$"]),
            ..spec("Bash")
        },
        LanguageSpec {
            mode_names: strings(&["javascript", "js", "js2"]),
            default_extension: Some(".js".to_string()),
            shebang_patterns: strings(&[r"(?im)#!.*\bnode(?:js)?\b.*$"]),
            primary: true,
            access_key: Some("j".to_string()),
            ..spec("JavaScript")
        },
        LanguageSpec {
            mode_names: strings(&["php"]),
            default_extension: Some(".php".to_string()),
            shebang_patterns: strings(&[r"(?im)#!.*\bphp\d*\b.*$"]),
            primary: true,
            access_key: Some("h".to_string()),
            ..spec("PHP")
        },
        LanguageSpec {
            // `mode: C` means C++ here.
            mode_names: strings(&["c++", "c", "cc"]),
            default_extension: Some(".cpp".to_string()),
            ..spec("C++")
        },
        LanguageSpec {
            mode_names: strings(&["makefile", "makefile-gmake"]),
            ..spec("Makefile")
        },
        LanguageSpec {
            mode_names: strings(&["diff"]),
            default_extension: Some(".diff".to_string()),
            ..spec("Diff")
        },
        LanguageSpec {
            mode_names: strings(&["xml", "nxml", "sgml"]),
            default_extension: Some(".xml".to_string()),
            primary: true,
            access_key: Some("x".to_string()),
            ..spec("XML")
        },
        LanguageSpec {
            mode_names: strings(&["html", "html-mode"]),
            default_extension: Some(".html".to_string()),
            public_ids: strings(&[
                "-//W3C//DTD HTML 4.01//EN",
                "-//W3C//DTD HTML 4.01 Transitional//EN",
                "-//W3C//DTD HTML 4.01 Frameset//EN",
                "-//W3C//DTD HTML 4.0 Transitional//EN",
            ]),
            system_ids: strings(&[
                "http://www.w3.org/TR/html4/strict.dtd",
                "http://www.w3.org/TR/html4/loose.dtd",
                "http://www.w3.org/TR/html4/frameset.dtd",
            ]),
            primary: true,
            access_key: Some("m".to_string()),
            ..spec("HTML")
        },
        LanguageSpec {
            mode_names: strings(&["html5"]),
            ..spec("HTML5")
        },
        LanguageSpec {
            mode_names: strings(&["xhtml"]),
            default_extension: Some(".xhtml".to_string()),
            namespaces: strings(&[XHTML_NAMESPACE]),
            public_ids: strings(&[
                "-//W3C//DTD XHTML 1.0 Strict//EN",
                "-//W3C//DTD XHTML 1.0 Transitional//EN",
                "-//W3C//DTD XHTML 1.0 Frameset//EN",
                "-//W3C//DTD XHTML 1.1//EN",
            ]),
            system_ids: strings(&[
                "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd",
                "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd",
                "http://www.w3.org/TR/xhtml1/DTD/xhtml1-frameset.dtd",
                "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd",
            ]),
            ..spec("XHTML")
        },
        LanguageSpec {
            mode_names: strings(&["xslt", "xsl"]),
            default_extension: Some(".xsl".to_string()),
            namespaces: strings(&["http://www.w3.org/1999/XSL/Transform"]),
            ..spec("XSLT")
        },
        LanguageSpec {
            default_extension: Some(".xul".to_string()),
            namespaces: strings(&["http://www.mozilla.org/keymaster/gatekeeper/there.is.only.xul"]),
            ..spec("XUL")
        },
        LanguageSpec {
            default_extension: Some(".svg".to_string()),
            namespaces: strings(&["http://www.w3.org/2000/svg"]),
            public_ids: strings(&["-//W3C//DTD SVG 1.1//EN"]),
            ..spec("SVG")
        },
        LanguageSpec {
            mode_names: strings(&["django"]),
            default_extension: Some(".django.html".to_string()),
            ..spec("Django")
        },
        LanguageSpec {
            internal: true,
            ..spec("Regex")
        },
    ]
}

/// Returns the factory `pattern -> language` table.
pub fn default_factory_associations() -> BTreeMap<String, String> {
    let pairs = [
        // Text
        ("*.txt", "Text"),
        ("README", "Text"),
        // Perl
        ("*.pl", "Perl"),
        ("*.pm", "Perl"),
        ("*.t", "Perl"),
        ("Conscript", "Perl"),
        ("Construct", "Perl"),
        // Python
        ("*.py", "Python"),
        ("*.pyw", "Python"),
        ("SConstruct", "Python"),
        ("SConscript", "Python"),
        // Tcl
        ("*.tcl", "Tcl"),
        ("*.exp", "Tcl"),
        // Ruby
        ("*.rb", "Ruby"),
        ("*.rake", "Ruby"),
        ("Rakefile", "Ruby"),
        ("Gemfile", "Ruby"),
        // Shell
        ("*.sh", "Bash"),
        ("*.bash", "Bash"),
        (".bashrc", "Bash"),
        (".bash_profile", "Bash"),
        // JavaScript
        ("*.js", "JavaScript"),
        ("*.mjs", "JavaScript"),
        // PHP
        ("*.php", "PHP"),
        ("*.inc", "PHP"),
        // C/C++
        ("*.c", "C++"),
        ("*.h", "C++"),
        ("*.cc", "C++"),
        ("*.cpp", "C++"),
        ("*.cxx", "C++"),
        ("*.hpp", "C++"),
        // Makefile
        ("Makefile", "Makefile"),
        ("GNUmakefile", "Makefile"),
        ("Makefile.*", "Makefile"),
        ("*.mak", "Makefile"),
        // Patches
        ("*.diff", "Diff"),
        ("*.patch", "Diff"),
        // Markup
        ("*.xml", "XML"),
        ("*.xsd", "XML"),
        ("*.rdf", "XML"),
        ("*.html", "HTML"),
        ("*.htm", "HTML"),
        ("*.xhtml", "XHTML"),
        ("*.xsl", "XSLT"),
        ("*.xslt", "XSLT"),
        ("*.django.html", "Django"),
    ];

    pairs
        .iter()
        .map(|(pattern, language)| (pattern.to_string(), language.to_string()))
        .collect()
}
