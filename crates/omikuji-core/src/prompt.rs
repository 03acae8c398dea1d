use crate::types::FortuneContext;

/// Prompt sent for a draw when the caller supplies none.
pub const DEFAULT_DRAW_PROMPT: &str = "おみくじを引いてください";

/// Build the chat prompt. With a fortune context, the agent is told to
/// answer from that result only, ignoring older draws in its memory.
pub fn chat_prompt(message: &str, context: Option<&FortuneContext>) -> String {
    let Some(ctx) = context else {
        return message.to_string();
    };
    format!(
        "【重要：今回のおみくじ結果（これが最新で唯一の結果です）】\n\
         運勢: {fortune}\n\
         ラッキーカラー: {color}\n\
         ラッキーアイテム: {item}\n\
         ラッキースポット: {spot}\n\
         \n\
         【ユーザーの質問】\n\
         {message}\n\
         \n\
         【指示】\n\
         - 上記のおみくじ結果のみを参照して回答してください\n\
         - 過去の会話や他のおみくじ結果は無視してください\n\
         - フレンドリーなギャル語で、短く楽しく答えてね✨",
        fortune = ctx.fortune,
        color = ctx.lucky_color,
        item = ctx.lucky_item,
        spot = ctx.lucky_spot,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_context_the_message_is_the_prompt() {
        assert_eq!(chat_prompt("ラッキーカラーは？", None), "ラッキーカラーは？");
    }

    #[test]
    fn context_is_embedded_ahead_of_the_question() {
        let ctx = FortuneContext {
            fortune: "大吉".into(),
            lucky_color: "ピンク".into(),
            lucky_item: "リップグロス".into(),
            lucky_spot: "カフェ".into(),
        };
        let prompt = chat_prompt("ラッキーカラーについて教えて", Some(&ctx));
        assert!(prompt.contains("運勢: 大吉\n"));
        assert!(prompt.contains("ラッキーカラー: ピンク\n"));
        assert!(prompt.contains("ラッキーアイテム: リップグロス\n"));
        assert!(prompt.contains("ラッキースポット: カフェ\n"));
        let question = prompt.find("ラッキーカラーについて教えて").unwrap();
        assert!(prompt.find("運勢: 大吉").unwrap() < question);
    }
}
