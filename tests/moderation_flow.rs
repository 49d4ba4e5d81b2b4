//! Integration tests for the moderation commands and the mute pre-filter,
//! driven through the binary's JSON-lines interface.

use anyhow::Result;
use serde_json::json;

mod common;
use common::{CHAT, DEV, TestBot};

#[tokio::test]
async fn test_third_warning_mutes_and_messages_are_deleted() -> Result<()> {
    let mut bot = TestBot::spawn("").await?;

    bot.say(CHAT, DEV, 1, "!rights [id10|Mod] 3").await?;
    let reply = bot.recv_text().await?;
    assert!(reply.contains("New level: Moderator (3)"), "{reply}");

    for count in 1..=3 {
        bot.say(CHAT, 10, 1 + count, "!warn [id20|Troll] spam").await?;
        let reply = bot.recv_text().await?;
        assert!(reply.contains(&format!("Warnings: {count}/3")), "{reply}");
        assert_eq!(reply.contains("Auto-muted until"), count == 3, "{reply}");
    }

    bot.say(CHAT, 20, 50, "I'm still here").await?;
    let effect = bot.recv().await?;
    assert_eq!(
        effect,
        json!({"type": "delete_message", "chat_id": CHAT, "message_id": 50})
    );

    // Commands from a muted user are deleted too.
    bot.say(CHAT, 20, 51, "!help").await?;
    assert_eq!(bot.recv().await?["type"], "delete_message");

    bot.say(CHAT, 10, 52, "!unmute [id20|Troll]").await?;
    assert!(bot.recv_text().await?.contains("no longer muted"));

    bot.say(CHAT, 20, 53, "!profile").await?;
    let profile = bot.recv_text().await?;
    assert!(profile.contains("Warnings: 3/3"), "{profile}");
    assert!(profile.contains("Not muted"), "{profile}");

    Ok(())
}

#[tokio::test]
async fn test_members_cannot_moderate() -> Result<()> {
    let mut bot = TestBot::spawn("").await?;

    bot.say(CHAT, 30, 1, "!kick [id31|Victim]").await?;
    assert_eq!(
        bot.recv_text().await?,
        "Access denied: requires level Moderator (3) or higher"
    );

    bot.say(CHAT, DEV, 2, "!rights [id30|Mod] 3").await?;
    bot.recv_text().await?;

    // Moderators cannot act on each other.
    bot.say(CHAT, DEV, 3, "!rights [id31|Other] 3").await?;
    bot.recv_text().await?;
    bot.say(CHAT, 30, 4, "!kick [id31|Other]").await?;
    let reply = bot.recv_text().await?;
    assert!(reply.starts_with("Access denied: target outranks"), "{reply}");

    bot.say(CHAT, 30, 5, "!kick").await?;
    assert_eq!(bot.recv_text().await?, "Usage: !kick @user [reason]");

    Ok(())
}

#[tokio::test]
async fn test_ban_keeps_user_out() -> Result<()> {
    let mut bot = TestBot::spawn("").await?;

    bot.say(CHAT, DEV, 1, "!ban [id50|Raider] 1h raid").await?;
    let reply = bot.recv_text().await?;
    assert!(reply.contains("Reason: raid"), "{reply}");
    assert_eq!(
        bot.recv().await?,
        json!({"type": "remove_member", "chat_id": CHAT, "user_id": 50})
    );

    bot.send(json!({"type": "member_joined", "chat_id": CHAT, "user_id": 50}))
        .await?;
    assert_eq!(
        bot.recv().await?,
        json!({"type": "remove_member", "chat_id": CHAT, "user_id": 50})
    );

    bot.say(CHAT, DEV, 2, "!unban [id50|Raider]").await?;
    bot.recv_text().await?;
    bot.send(json!({"type": "member_joined", "chat_id": CHAT, "user_id": 50}))
        .await?;
    bot.expect_silence().await?;

    Ok(())
}

#[tokio::test]
async fn test_content_filters_follow_chat_settings() -> Result<()> {
    let mut bot = TestBot::spawn("[filters]\nbanned_words = [\"heck\"]\n").await?;

    bot.say(CHAT, 60, 1, "what the HECK").await?;
    assert_eq!(
        bot.recv().await?,
        json!({"type": "delete_message", "chat_id": CHAT, "message_id": 1})
    );

    bot.say(CHAT, 60, 2, "look at www.example.com").await?;
    assert_eq!(bot.recv().await?["message_id"], 2);

    bot.say(CHAT, DEV, 3, "!settings antimat off").await?;
    assert!(bot.recv_text().await?.contains("antimat is now off"));

    bot.say(CHAT, 60, 4, "what the heck").await?;
    bot.expect_silence().await?;

    Ok(())
}

#[tokio::test]
async fn test_flood_is_cut_off() -> Result<()> {
    let mut bot = TestBot::spawn("[filters]\nflood_messages_per_second = 1\nflood_burst = 3\n").await?;

    for id in 1..=10 {
        bot.say(CHAT, 70, id, "spam").await?;
    }
    let effect = bot.recv().await?;
    assert_eq!(effect["type"], "delete_message");
    assert!(effect["message_id"].as_i64().unwrap_or_default() > 3, "{effect}");

    Ok(())
}
