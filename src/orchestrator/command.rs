//! 终端命令解析
//!
//! 一行输入对应一个命令，解析是纯函数，不接触会话状态

use crate::models::book::NewBook;
use crate::models::quiz::{Difficulty, QuizRequest};
use crate::services::book_assistant::Language;

/// 帮助文本
pub const HELP: &str = "\
Commands:
  list [query]                         search the library (title / author / tag)
  add title|author|tags|cover|content  add a book to the front of the library
  demo                                 add the demo book with sample text
  open <n>                             open book n from the last list
  close                                back to the library
  save                                 add/remove the open book to My Books
  shelf                                show My Books
  remove <n>                           remove book n from My Books
  content <text>                       replace the open book's excerpt
  show                                 show the open book and its AI results
  summary | keywords                   ask the AI about the excerpt
  translate <language>                 Russian, Kazakh, French, German, Spanish
  ask <question>                       chat with the book
  quiz [n] [easy|medium|hard]          generate a multiple-choice quiz
  play                                 reformat the quiz and start playing
  load <file>                          play a quiz from a ###-separated text file
  pick <question> <choice>             answer a question (both 1-based)
  submit                               score the quiz
  export                               print the quiz session as JSON
  help | quit";

/// 终端命令，`add` 的字段按 `|` 分隔
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List(String),
    Add(NewBook),
    Demo,
    Open(usize),
    Close,
    Save,
    Shelf,
    Remove(usize),
    Content(String),
    Show,
    Summary,
    Keywords,
    Translate(Language),
    Ask(String),
    Quiz(QuizRequest),
    Play,
    Load(String),
    Pick { question: usize, choice: usize },
    Submit,
    Export,
    Help,
    Quit,
}

impl Command {
    /// 解析一行输入；无法识别或参数不合法时返回说明
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "list" | "ls" => Command::List(rest.to_string()),
            "add" => Command::Add(parse_book_form(rest)),
            "demo" => Command::Demo,
            "open" => Command::Open(parse_number(rest, "open")?),
            "close" | "back" => Command::Close,
            "save" => Command::Save,
            "shelf" => Command::Shelf,
            "remove" => Command::Remove(parse_number(rest, "remove")?),
            "content" => Command::Content(rest.to_string()),
            "show" => Command::Show,
            "summary" => Command::Summary,
            "keywords" => Command::Keywords,
            "translate" => Command::Translate(
                Language::from_name(rest).ok_or_else(|| format!("unknown language: {}", rest))?,
            ),
            "ask" if !rest.is_empty() => Command::Ask(rest.to_string()),
            "ask" => return Err("usage: ask <question>".to_string()),
            "quiz" => Command::Quiz(parse_quiz_request(rest)?),
            "play" => Command::Play,
            "load" if !rest.is_empty() => Command::Load(rest.to_string()),
            "load" => return Err("usage: load <file>".to_string()),
            "pick" => {
                let mut parts = rest.split_whitespace();
                let (Some(question), Some(choice), None) = (parts.next(), parts.next(), parts.next())
                else {
                    return Err("usage: pick <question> <choice>".to_string());
                };
                Command::Pick {
                    question: parse_number(question, "pick")?,
                    choice: parse_number(choice, "pick")?,
                }
            }
            "submit" => Command::Submit,
            "export" => Command::Export,
            "help" | "?" | "" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {}", other)),
        };

        Ok(command)
    }
}

fn parse_number(value: &str, command: &str) -> Result<usize, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{}: expected a number, got '{}'", command, value.trim()))
}

fn parse_book_form(rest: &str) -> NewBook {
    let mut fields = rest.splitn(5, '|').map(|f| f.trim().to_string());
    NewBook {
        title: fields.next().unwrap_or_default(),
        author: fields.next().unwrap_or_default(),
        tags: fields.next().unwrap_or_default(),
        cover_url: fields.next().unwrap_or_default(),
        content: fields.next().unwrap_or_default(),
    }
}

/// `quiz [n] [difficulty]`，两个参数顺序不限
fn parse_quiz_request(rest: &str) -> Result<QuizRequest, String> {
    let defaults = QuizRequest::default();
    let mut count = defaults.num_questions();
    let mut difficulty = defaults.difficulty;

    for arg in rest.split_whitespace() {
        if let Ok(n) = arg.parse::<u8>() {
            count = n;
        } else if let Some(d) = Difficulty::from_name(arg) {
            difficulty = d;
        } else {
            return Err(format!("quiz: unexpected argument '{}'", arg));
        }
    }

    Ok(QuizRequest::new(count, difficulty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::parse("  list  "), Ok(Command::List(String::new())));
        assert_eq!(
            Command::parse("list Orwell"),
            Ok(Command::List("Orwell".to_string()))
        );
        assert_eq!(Command::parse("OPEN 2"), Ok(Command::Open(2)));
        assert_eq!(Command::parse(""), Ok(Command::Help));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_add_splits_fields() {
        let Ok(Command::Add(form)) = Command::parse("add Dune | Frank Herbert | sci-fi, classic") else {
            panic!("expected add");
        };
        assert_eq!(form.title, "Dune");
        assert_eq!(form.author, "Frank Herbert");
        assert_eq!(form.tags, "sci-fi, classic");
        assert_eq!(form.content, "");
    }

    #[test]
    fn test_add_keeps_pipes_in_content() {
        let Ok(Command::Add(form)) = Command::parse("add T|A|t|c|one | two") else {
            panic!("expected add");
        };
        assert_eq!(form.content, "one | two");
    }

    #[test]
    fn test_quiz_arguments() {
        assert_eq!(
            Command::parse("quiz"),
            Ok(Command::Quiz(QuizRequest::default()))
        );
        assert_eq!(
            Command::parse("quiz hard 5"),
            Ok(Command::Quiz(QuizRequest::new(5, Difficulty::Hard)))
        );
        assert_eq!(
            Command::parse("quiz 99"),
            Ok(Command::Quiz(QuizRequest::new(8, Difficulty::Medium)))
        );
        assert!(Command::parse("quiz impossible").is_err());
    }

    #[test]
    fn test_pick_requires_two_numbers() {
        assert_eq!(
            Command::parse("pick 1 3"),
            Ok(Command::Pick {
                question: 1,
                choice: 3
            })
        );
        assert!(Command::parse("pick 1").is_err());
        assert!(Command::parse("pick a b").is_err());
        assert!(Command::parse("pick 1 2 3").is_err());
    }

    #[test]
    fn test_translate_and_errors() {
        assert_eq!(
            Command::parse("translate spanish"),
            Ok(Command::Translate(Language::Spanish))
        );
        assert!(Command::parse("translate latin").is_err());
        assert!(Command::parse("ask").is_err());
        assert!(Command::parse("dance").is_err());
    }
}
