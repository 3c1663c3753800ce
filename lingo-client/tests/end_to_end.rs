use std::net::TcpListener;

use anyhow::Context;
use lingo_client::client::{self, Endpoint};
use lingo_client::{AcceptOutcome, AuthState, ClientConfig, ClientError, LingoClient, SendOutcome};
use lingo_common::non_api_structs::Affordance;
use lingo_common::{AuthSession, Language, OnboardingProfile, UserId};

async fn start_server() -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let state = lingo_server::State::temporary()?;
    tokio::spawn(lingo_server::serve(listener, state));
    Ok(format!("http://{addr}/api"))
}

async fn member(api: &str, name: &str, native: &str, learning: &str) -> anyhow::Result<(AuthSession, LingoClient)> {
    let session = client::signup(&reqwest::Client::new(), &Endpoint::new(api, None), name).await?;
    let (lingo, _notices) = LingoClient::connect(ClientConfig::new(api).with_token(session.token.clone()))?;
    lingo
        .session
        .complete_onboarding(&OnboardingProfile {
            full_name: name.to_string(),
            bio: format!("{name} wants to practice"),
            native_language: Language::from(native),
            learning_language: Language::from(learning),
            location: String::from("Lisbon"),
            profile_pic: None,
        })
        .await?;
    Ok((session, lingo))
}

fn reconnect(api: &str, session: &AuthSession) -> anyhow::Result<LingoClient> {
    Ok(LingoClient::connect(ClientConfig::new(api).with_token(session.token.clone()))?.0)
}

fn card_for<'a>(cards: &'a [lingo_client::projector::UserCard], id: &UserId) -> anyhow::Result<&'a lingo_client::projector::UserCard> {
    cards.iter().find(|card| &card.user.id == id).with_context(|| format!("no card for {id}"))
}

#[tokio::test]
async fn friend_request_lifecycle_against_the_reference_server() -> anyhow::Result<()> {
    let api = start_server().await?;
    let (ana_session, ana) = member(&api, "Ana", "spanish", "english").await?;
    let (ben_session, ben) = member(&api, "Ben", "english", "spanish").await?;
    let (cara_session, _cara) = member(&api, "Cara", "french", "german").await?;
    let (ana_id, ben_id, cara_id) = (ana_session.user.id.clone(), ben_session.user.id.clone(), cara_session.user.id.clone());

    let me = ana.session.require_user().await?;
    assert!(me.is_onboarded);
    assert_eq!(me.native_language, Language::from("spanish"));

    let cards = ana.recommended_cards().await?;
    assert_eq!(cards.len(), 2);
    assert_eq!(card_for(&cards, &ben_id)?.affordance, Affordance::Send { enabled: true });
    assert_eq!(card_for(&cards, &ben_id)?.native.label, "English");

    let outcome = ana.dispatcher.send_request(&ben_id).await?;
    assert!(matches!(outcome, SendOutcome::Sent(ref sent) if sent.recipient_id() == Some(&ben_id)));
    let cards = ana.recommended_cards().await?;
    assert_eq!(card_for(&cards, &ben_id)?.affordance, Affordance::Pending);
    assert_eq!(card_for(&cards, &cara_id)?.affordance, Affordance::Send { enabled: true });
    assert_eq!(ana.dispatcher.send_request(&ben_id).await?, SendOutcome::AlreadyPending);

    let err = ana.dispatcher.send_request(&ana_id).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected { status: 400, .. }));
    let err = ana.dispatcher.send_request(&UserId::from("nobody")).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));

    let view = ben.notifications().await?;
    assert_eq!(view.incoming.len(), 1);
    assert_eq!(view.incoming[0].sender.as_ref().map(|sender| &sender.id), Some(&ana_id));
    let err = ben.dispatcher.send_request(&ana_id).await.unwrap_err();
    assert!(matches!(err, ClientError::Conflict(_)));

    let request = view.incoming[0].request.clone();
    assert!(matches!(ben.dispatcher.accept_request(&request).await?, AcceptOutcome::Accepted(_)));
    assert!(ben.notifications().await?.incoming.is_empty());
    let friends = ben.queries.friends().await?;
    assert_eq!(friends.iter().map(|friend| &friend.id).collect::<Vec<_>>(), vec![&ana_id]);

    let err = ben.dispatcher.accept_request(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::Conflict(_)));

    let ana = reconnect(&api, &ana_session)?;
    assert!(ana.queries.outgoing_requests().await?.is_empty());
    let view = ana.notifications().await?;
    assert_eq!(view.new_connections.iter().map(|user| &user.id).collect::<Vec<_>>(), vec![&ben_id]);
    let cards = ana.recommended_cards().await?;
    assert!(card_for(&cards, &ben_id).is_err());
    assert_eq!(ana.friend_cards().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn accepting_an_unknown_request_is_not_found() -> anyhow::Result<()> {
    let api = start_server().await?;
    let (_session, ana) = member(&api, "Ana", "spanish", "english").await?;
    let before = ana.notifications().await?;

    let err = ana
        .dispatcher
        .accept_request(&lingo_common::FriendRequestId::from("r7"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(ref message) if message == "Friend request not found"));
    assert_eq!(ana.notifications().await?, before);
    Ok(())
}

#[tokio::test]
async fn logout_and_bad_tokens_end_the_session() -> anyhow::Result<()> {
    let api = start_server().await?;
    let (session, ana) = member(&api, "Ana", "spanish", "english").await?;

    let (stranger, _notices) = LingoClient::connect(ClientConfig::new(&api).with_token("not-a-token"))?;
    assert_eq!(stranger.session.current_user().await?, AuthState::Unauthenticated);
    assert_eq!(stranger.recommended_cards().await.unwrap_err(), ClientError::Unauthorized);

    ana.session.logout().await?;
    assert!(ana.cache.is_signed_out());
    let ana = reconnect(&api, &session)?;
    assert_eq!(ana.session.current_user().await?, AuthState::Unauthenticated);
    Ok(())
}

#[tokio::test]
async fn onboarding_with_blank_fields_is_rejected_by_the_server() -> anyhow::Result<()> {
    let api = start_server().await?;
    let session = client::signup(&reqwest::Client::new(), &Endpoint::new(api.as_str(), None), "Dee").await?;
    let endpoint = Endpoint::new(api.as_str(), Some(session.token));
    let err = client::complete_onboarding(&reqwest::Client::new(), &endpoint, &OnboardingProfile::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Rejected { status: 400, ref message } if message.starts_with("All fields are required")));
    Ok(())
}
