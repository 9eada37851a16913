use std::sync::Arc;

use groupcast::{
    BroadcastSink, Channel, ChannelLayer, DistributedLayer, GroupStore, InMemoryGroupStore,
    Payload,
};

/// Два процесса с общим хранилищем: членство, добавленное одним,
/// видно другому, а рассылка идёт через общий sink отправителя.
#[tokio::test]
async fn test_membership_is_shared_between_layers() {
    let store = InMemoryGroupStore::new();
    let sink_a = Arc::new(BroadcastSink::new(16));
    let mut rx_a = sink_a.subscribe();
    let a = DistributedLayer::with_sink(store.clone(), "group", sink_a.clone()).unwrap();
    let b = DistributedLayer::with_sink(store.clone(), "group", Arc::new(BroadcastSink::new(16)))
        .unwrap();

    b.add_named("room", "bob", None).await.unwrap();
    b.add_named("room", "carol", None).await.unwrap();
    assert_eq!(a.members("room").await.unwrap().len(), 2);

    a.group_send("room", Payload::from("hi")).await.unwrap();
    assert_eq!(rx_a.recv().await.unwrap(), Payload::from("hi"));
    assert_eq!(rx_a.recv().await.unwrap(), Payload::from("hi"));

    a.flush().await.unwrap();
    assert!(b.members("room").await.unwrap().is_empty());
    assert_eq!(store.connect_count(), 2);
}

#[tokio::test]
async fn test_prefixes_isolate_namespaces() {
    let store = InMemoryGroupStore::new();
    let chat = DistributedLayer::new(store.clone(), "chat").unwrap();
    let game = DistributedLayer::new(store.clone(), "game").unwrap();

    let ch = Channel::named("p1", None).unwrap();
    chat.add("room", &ch).await.unwrap();
    game.add("room", &ch).await.unwrap();

    game.remove_channel(&ch).await.unwrap();
    assert_eq!(chat.members("room").await.unwrap(), vec!["p1"]);
    assert!(game.members("room").await.unwrap().is_empty());

    game.flush().await.unwrap();
    assert_eq!(store.hkeys("chat_room").await.unwrap(), vec!["p1"]);
}

/// Канал опознаётся только по имени: два канала с одним именем дают
/// одно поле в хранилище.
#[tokio::test]
async fn test_same_name_is_one_member() {
    let layer = DistributedLayer::new(InMemoryGroupStore::new(), "group").unwrap();
    let one = Channel::named("twin", None).unwrap();
    let two = Channel::named("twin", None).unwrap();
    layer.add("room", &one).await.unwrap();
    layer.add("room", &two).await.unwrap();
    assert_eq!(layer.members("room").await.unwrap(), vec!["twin"]);

    layer.remove("room", &two).await.unwrap();
    assert!(layer.members("room").await.unwrap().is_empty());
}

/// Требует запущенный Redis: GROUPCAST_TEST_REDIS_URL=redis://localhost
#[cfg(feature = "redis")]
#[tokio::test]
#[ignore]
async fn test_redis_round_trip() {
    use groupcast::RedisGroupStore;

    let url = std::env::var("GROUPCAST_TEST_REDIS_URL")
        .unwrap_or_else(|_| "redis://localhost".to_string());
    let sink = Arc::new(BroadcastSink::new(8));
    let mut rx = sink.subscribe();
    let layer = DistributedLayer::with_sink(
        RedisGroupStore::open(&url).unwrap(),
        "groupcast_test",
        sink,
    )
    .unwrap();

    layer.flush().await.unwrap();
    layer.add_named("room", "alice", None).await.unwrap();
    assert_eq!(layer.members("room").await.unwrap(), vec!["alice"]);

    layer.group_send("room", Payload::from("ping")).await.unwrap();
    assert_eq!(rx.recv().await.unwrap(), Payload::from("ping"));

    let alice = Channel::named("alice", None).unwrap();
    layer.remove_channel(&alice).await.unwrap();
    assert!(layer.members("room").await.unwrap().is_empty());
    layer.flush().await.unwrap();
}
