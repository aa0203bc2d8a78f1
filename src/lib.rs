/*!
A small backtracking regular expression engine.

A pattern is compiled to a tree of match nodes and matched by walking that
tree with explicit backtracking. The flavor is deliberately small: literal
characters, `.`, bracket classes, shorthand classes like `\d`, groups and
alternation, greedy and lazy quantifiers, anchors, word boundaries,
lookahead assertions, and backreferences. There are no flags and no
Unicode tables; `\w` and friends use simple character predicates.

# Usage

Compile a pattern with [`Regex::new`] and search with [`Regex::find`]:

```rust
use nodex::Regex;

let re = Regex::new(r"\d{4}").unwrap();
let text = "2020-06-05";
let mat = re.find(text).unwrap();
assert_eq!(&text[mat.range()], "2020");
```

Capture groups are numbered from 1; group 0 is the whole match:

```rust
use nodex::Regex;

let re = Regex::new(r"(\d{4})-(\d{2})").unwrap();
let text = "2020-06-05";
let mat = re.find(text).unwrap();
assert_eq!(&text[mat.group(1)], "2020");
assert_eq!(&text[mat.group(2)], "06");
```

Iterate over every match, here using a backreference to find doubled
letters:

```rust
use nodex::Regex;

let re = Regex::new(r"(\w)\1").unwrap();
let text = "Frankly, Miss Piggy, I don't give a hoot!";
let doubled: Vec<&str> = re.find_iter(text).map(|m| &text[m.range()]).collect();
assert_eq!(doubled, vec!["ss", "gg", "oo"]);
```

Matches are leftmost-first: the engine reports the match starting at the
earliest position, and at that position the first alternative that can
complete wins.
*/

#![warn(clippy::all)]

mod api;
mod backtrack;
mod charclasses;
mod node;
mod parse;
mod startpredicate;

pub use crate::api::*;
