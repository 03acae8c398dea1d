//! Locally generated replies for when the agent runtime is unavailable,
//! unconfigured, or answers with nothing usable.
//!
//! Randomness comes from the caller so tests can pin outcomes with a
//! seeded RNG; production passes `rand::thread_rng()`.

use rand::Rng;

use crate::types::{now_timestamp, Fortune, FortuneRecord};

pub const LUCKY_COLORS: [&str; 6] = [
    "ピンク",
    "水色",
    "ラベンダー",
    "ミントグリーン",
    "コーラル",
    "ゴールド",
];

pub const LUCKY_ITEMS: [&str; 5] = [
    "リップグロス",
    "ミラー",
    "お気に入りのアクセ",
    "ハンドクリーム",
    "推しのグッズ",
];

pub const LUCKY_SPOTS: [&str; 5] = ["カフェ", "ショッピングモール", "公園", "神社", "映画館"];

/// Used when a label has no template.
pub const PLACEHOLDER_MESSAGE: &str = "おみくじの結果です！";

const CHAT_RETRY_MESSAGE: &str = "ごめんね、ちょっと上手く答えられなかった💦 もう一回聞いてみて！";
const CHAT_UNCONFIGURED_MESSAGE: &str =
    "ごめんね、AIエージェントがまだ設定されてないみたい💦 管理者に連絡してね！";
const CHAT_ERROR_MESSAGE: &str = "申し訳ないけど、ちょっとエラーが出ちゃった💦 もう一回試してみて！";

/// A complete locally drawn fortune.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawFallback {
    pub message: String,
    pub record: FortuneRecord,
}

/// Draw a fortune uniformly from the six labels, with independently chosen
/// lucky attributes and a message matching the label.
pub fn draw<R: Rng>(rng: &mut R) -> DrawFallback {
    let fortune = Fortune::ALL[rng.gen_range(0..Fortune::ALL.len())];
    let record = FortuneRecord::new(
        fortune,
        pick(rng, &LUCKY_COLORS),
        pick(rng, &LUCKY_ITEMS),
        pick(rng, &LUCKY_SPOTS),
        now_timestamp(),
    );
    DrawFallback {
        message: fortune_message(fortune.label()).to_string(),
        record,
    }
}

/// Template message for a fortune label.
pub fn fortune_message(label: &str) -> &'static str {
    match label.parse::<Fortune>() {
        Ok(Fortune::Daikichi) => {
            "✨ やばい！めっちゃ最高の運勢じゃん！今日は何やってもうまくいくから、思い切ってチャレンジしちゃお！💕"
        }
        Ok(Fortune::Chukichi) => {
            "💖 いい感じ～！ちょっと頑張れば素敵なことが起こりそう！推し活も捗るかも！"
        }
        Ok(Fortune::Shokichi) => "🌸 まあまあいい感じ！小さな幸せを見つけられる日だよ！",
        Ok(Fortune::Kichi) => "🍀 普通にいい日！コツコツ頑張ってれば良いことあるよ！",
        Ok(Fortune::Suekichi) => "🌿 ゆっくりだけど運気上昇中！焦らずいこ！",
        Ok(Fortune::Kyo) => {
            "☁️ 今日はおとなしくしてた方がいいかも...でも明日はきっといい日になるよ！"
        }
        Err(_) => PLACEHOLDER_MESSAGE,
    }
}

/// Reply used when the agent answered but said nothing usable.
pub fn chat_message() -> &'static str {
    CHAT_RETRY_MESSAGE
}

/// Reply used when no agent runtime is configured.
pub fn unconfigured_chat_message() -> &'static str {
    CHAT_UNCONFIGURED_MESSAGE
}

/// User-facing reply for unexpected internal failures.
pub fn error_chat_message() -> &'static str {
    CHAT_ERROR_MESSAGE
}

fn pick<R: Rng>(rng: &mut R, options: &[&str]) -> String {
    options[rng.gen_range(0..options.len())].to_string()
}
