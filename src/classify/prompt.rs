/// Fixed classification prompt. The menu enumerates exactly the five
/// assignable labels; the service is told to answer with the bare name.
pub const SYSTEM_PROMPT: &str = "あなたはSNS投稿を分類するアシスタントです。";

pub fn classification_prompt(text: &str) -> String {
    let mut lines = Vec::new();
    lines.push("以下のツイートを、次のカテゴリから1つ選んで分類してください：".to_string());
    lines.push("- モチベ系（やる気・自己肯定・ポジティブな内容）".to_string());
    lines.push("- 記録系（回数・メニュー・日数など）".to_string());
    lines.push("- 食事・栄養系（サプリや栄養成分など）".to_string());
    lines.push("- 情報系（商品紹介・知識・テクニックなど）".to_string());
    lines.push("- 雑談系（筋トレ以外や混ざった話題）".to_string());
    lines.push(String::new());
    lines.push("ツイート本文：".to_string());
    lines.push(text.to_string());
    lines.push(String::new());
    lines.push("カテゴリ名のみで回答してください（例：「モチベ系」）".to_string());
    lines.join("\n")
}
