// crates/cli/src/args.rs
use clap::{ArgAction, Parser, ValueHint};
use std::path::PathBuf;

/// Top-level CLI arguments parsed via clap.
#[derive(Parser, Debug)]
#[command(
    name = "verstamp",
    version = crate::VERSION,
    about = "ヘッダーコメントの `Version:` 行を固定バージョンに書き換えるツール"
)]
pub struct Args {
    /// 対象ディレクトリ（省略時は実行ファイルのあるディレクトリ）
    #[arg(value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// 最初のエラーで処理を中断する
    #[arg(long, help_heading = "動作")]
    pub strict: bool,

    /// 内容が変わったファイルだけ書き戻す
    #[arg(long, help_heading = "動作")]
    pub only_changed: bool,

    /// ログを詳細にする（複数指定可: -v, -vv, -vvv）
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet", help_heading = "ログ")]
    pub verbose: u8,

    /// エラー以外のログを抑制する
    #[arg(short, long, help_heading = "ログ")]
    pub quiet: bool,
}
