// src/harness.rs

//! Per-language harness templates for grading submitted code.
//!
//! A harness is a complete program: the candidate's code followed by an
//! entry point that evaluates the test case's literal input expression,
//! prints the stringified result on stdout, and catches runtime failures
//! as an `ERROR:`-prefixed line instead of crashing. Harness generation is
//! centralized here; one template per language variant, one test each.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Java,
    Cpp,
    Go,
}

impl Language {
    /// Lenient parse of client-supplied language names.
    /// Unknown names fall back to JavaScript, matching the grader's default.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "python" | "python3" | "py" => Language::Python,
            "java" => Language::Java,
            "cpp" | "c++" => Language::Cpp,
            "go" | "golang" => Language::Go,
            _ => Language::Javascript,
        }
    }

    /// Language identifier understood by the Piston-style sandbox.
    pub fn sandbox_name(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::Go => "go",
        }
    }

    /// Runtime version requested from the sandbox. Node is pinned; the
    /// other runtimes take whatever the sandbox has installed.
    pub fn sandbox_version(&self) -> &'static str {
        match self {
            Language::Javascript => "18.15.0",
            _ => "*",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Language::Python => "main.py",
            Language::Javascript => "main.js",
            Language::Java => "Main.java",
            Language::Cpp => "main.cpp",
            Language::Go => "main.go",
        }
    }
}

/// Builds the complete program for one test case.
pub fn wrap(language: Language, code: &str, input_expr: &str) -> String {
    match language {
        Language::Python => format!(
            r#"{code}

try:
    result = {input_expr}
    print(str(result))
except Exception as error:
    print("ERROR: " + str(error))
"#
        ),
        Language::Javascript => format!(
            r#"{code}

try {{
  const result = {input_expr};
  console.log(String(result));
}} catch (error) {{
  console.log("ERROR: " + error.message);
}}
"#
        ),
        Language::Java => format!(
            r#"{code}

public class Main {{
    public static void main(String[] args) {{
        try {{
            System.out.println({input_expr});
        }} catch (Exception error) {{
            System.out.println("ERROR: " + error.getMessage());
        }}
    }}
}}
"#
        ),
        Language::Cpp => format!(
            r#"#include <iostream>
#include <string>
using namespace std;

{code}

int main() {{
    try {{
        cout << {input_expr} << endl;
    }} catch (const exception& error) {{
        cout << "ERROR: " << error.what() << endl;
    }}
    return 0;
}}
"#
        ),
        Language::Go => format!(
            r#"package main

import "fmt"

{code}

func main() {{
    defer func() {{
        if r := recover(); r != nil {{
            fmt.Println("ERROR:", r)
        }}
    }}()

    result := {input_expr}
    fmt.Println(result)
}}
"#
        ),
    }
}
