//! Thin per-endpoint methods.
//!
//! Each method maps one remote resource to a path, a parameter set and a
//! verb, then hands them to [`Instagram::call`]. Ids, tag names and
//! shortcodes are escaped with [`path_segment`] before they are placed in the
//! path. Responses are returned verbatim.
use std::fmt::Display;

use serde_json::Value;

use crate::{
    path_segment, Action, Error, Instagram, Params, Result, SecretsProvider, Transport, Verb,
};

const DEFAULT_DISTANCE: u32 = 1000;
const DEFAULT_SUBSCRIPTION_OBJECT: &str = "user";
const DEFAULT_SUBSCRIPTION_ASPECT: &str = "media";
const ALL_SUBSCRIPTIONS: &str = "all";

impl<T> Instagram<T>
where
    T: Transport,
{
    // ------------------------------------------------------------------------
    // Users

    /// Search for a user by name.
    pub async fn search_user(&self, name: &str, count: Option<u32>) -> Result<Value> {
        let params = Params::new().param("q", name).optional("count", count);
        self.get("users/search", Some(&params)).await
    }

    /// Get user info. Pass `"self"` for the authenticated user.
    pub async fn get_user<I: Display>(&self, id: I) -> Result<Value> {
        let path = format!("users/{}", path_segment(id)?);
        self.get(&path, None).await
    }

    /// Get the most recent media published by a user.
    pub async fn get_user_media<I: Display>(
        &self,
        id: I,
        count: Option<u32>,
        max_id: Option<&str>,
        min_id: Option<&str>,
    ) -> Result<Value> {
        let params = Params::new()
            .optional("count", count)
            .optional("max_id", max_id)
            .optional("min_id", min_id);
        let path = format!("users/{}/media/recent", path_segment(id)?);
        self.get(&path, Some(&params)).await
    }

    /// Get the media liked by the authenticated user.
    pub async fn get_user_likes(&self, count: Option<u32>, max_id: Option<&str>) -> Result<Value> {
        let params = Params::new()
            .optional("count", count)
            .optional("max_id", max_id);
        self.get("users/self/media/liked", Some(&params)).await
    }

    pub async fn get_user_follows(&self, count: Option<u32>) -> Result<Value> {
        let params = Params::new().optional("count", count);
        self.get("users/self/follows", Some(&params)).await
    }

    pub async fn get_user_followers(&self, count: Option<u32>) -> Result<Value> {
        let params = Params::new().optional("count", count);
        self.get("users/self/followed-by", Some(&params)).await
    }

    /// Users who have requested permission to follow the authenticated user.
    pub async fn get_user_follower_requests(&self, count: Option<u32>) -> Result<Value> {
        let params = Params::new().optional("count", count);
        self.get("users/self/requested-by", Some(&params)).await
    }

    pub async fn get_user_relationship<I: Display>(&self, id: I) -> Result<Value> {
        let path = format!("users/{}/relationship", path_segment(id)?);
        self.get(&path, None).await
    }

    /// Modify the relationship between the authenticated user and `user`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidAction`] without any network activity when
    /// `action` is not one of follow/unfollow/block/unblock/approve/deny or
    /// `user` is empty. A `user` of `.` or `..` fails with
    /// [`Error::InvalidPath`].
    pub async fn modify_relationship<I: Display>(&self, action: &str, user: I) -> Result<Value> {
        let action: Action = action
            .parse()
            .map_err(|_| Error::InvalidAction(format!("unknown action {}", action)))?;
        let user = user.to_string();
        if user.is_empty() {
            return Err(Error::InvalidAction("missing target user".to_string()));
        }
        let path = format!("users/{}/relationship", path_segment(user)?);
        let params = Params::new().param("action", action);
        self.call(&path, Some(&params), Verb::Post).await
    }

    // ------------------------------------------------------------------------
    // Media

    /// Search for media around a coordinate. `distance` defaults to 1000m.
    pub async fn search_media(
        &self,
        lat: f64,
        lng: f64,
        distance: Option<u32>,
        min_timestamp: Option<i64>,
        max_timestamp: Option<i64>,
    ) -> Result<Value> {
        let params = Params::new()
            .param("lat", lat)
            .param("lng", lng)
            .param("distance", distance.unwrap_or(DEFAULT_DISTANCE))
            .optional("min_timestamp", min_timestamp)
            .optional("max_timestamp", max_timestamp);
        self.get("media/search", Some(&params)).await
    }

    pub async fn get_media<I: Display>(&self, id: I) -> Result<Value> {
        let path = format!("media/{}", path_segment(id)?);
        self.get(&path, None).await
    }

    pub async fn get_media_by_shortcode(&self, shortcode: &str) -> Result<Value> {
        let path = format!("media/shortcode/{}", path_segment(shortcode)?);
        self.get(&path, None).await
    }

    pub async fn get_media_likes<I: Display>(&self, id: I) -> Result<Value> {
        let path = format!("media/{}/likes", path_segment(id)?);
        self.get(&path, None).await
    }

    pub async fn like_media<I: Display>(&self, id: I) -> Result<Value> {
        let path = format!("media/{}/likes", path_segment(id)?);
        self.call(&path, None, Verb::Post).await
    }

    pub async fn delete_liked_media<I: Display>(&self, id: I) -> Result<Value> {
        let path = format!("media/{}/likes", path_segment(id)?);
        self.call(&path, None, Verb::Delete).await
    }

    pub async fn get_media_comments<I: Display>(&self, id: I) -> Result<Value> {
        let path = format!("media/{}/comments", path_segment(id)?);
        self.get(&path, None).await
    }

    pub async fn add_media_comment<I: Display>(&self, id: I, text: &str) -> Result<Value> {
        let params = Params::new().param("text", text);
        let path = format!("media/{}/comments", path_segment(id)?);
        self.call(&path, Some(&params), Verb::Post).await
    }

    pub async fn delete_media_comment<I, C>(&self, id: I, comment_id: C) -> Result<Value>
    where
        I: Display,
        C: Display,
    {
        let path = format!(
            "media/{}/comments/{}",
            path_segment(id)?,
            path_segment(comment_id)?
        );
        self.call(&path, None, Verb::Delete).await
    }

    // ------------------------------------------------------------------------
    // Tags

    pub async fn search_tags(&self, name: &str) -> Result<Value> {
        let params = Params::new().param("q", name);
        self.get("tags/search", Some(&params)).await
    }

    pub async fn get_tag(&self, name: &str) -> Result<Value> {
        let path = format!("tags/{}", path_segment(name)?);
        self.get(&path, None).await
    }

    /// Get recently tagged media.
    pub async fn get_tag_media(
        &self,
        name: &str,
        count: Option<u32>,
        max_tag_id: Option<&str>,
        min_tag_id: Option<&str>,
    ) -> Result<Value> {
        let params = Params::new()
            .optional("count", count)
            .optional("max_tag_id", max_tag_id)
            .optional("min_tag_id", min_tag_id);
        let path = format!("tags/{}/media/recent", path_segment(name)?);
        self.get(&path, Some(&params)).await
    }

    // ------------------------------------------------------------------------
    // Locations

    pub async fn get_location<I: Display>(&self, id: I) -> Result<Value> {
        let path = format!("locations/{}", path_segment(id)?);
        self.get(&path, None).await
    }

    pub async fn get_location_media<I: Display>(
        &self,
        id: I,
        max_id: Option<&str>,
        min_id: Option<&str>,
    ) -> Result<Value> {
        let params = Params::new()
            .optional("max_id", max_id)
            .optional("min_id", min_id);
        let path = format!("locations/{}/media/recent", path_segment(id)?);
        self.get(&path, Some(&params)).await
    }

    /// Search for locations around a coordinate. `distance` defaults to 1000m.
    pub async fn search_location(&self, lat: f64, lng: f64, distance: Option<u32>) -> Result<Value> {
        let params = Params::new()
            .param("lat", lat)
            .param("lng", lng)
            .param("distance", distance.unwrap_or(DEFAULT_DISTANCE));
        self.get("locations/search", Some(&params)).await
    }

    // ------------------------------------------------------------------------
    // Subscriptions

    /// Create a real-time subscription.
    ///
    /// `object` defaults to `user` and `aspect` to `media`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MissingParameter`] when `verify_token` or
    /// `callback_url` is empty.
    pub async fn create_subscription(
        &self,
        object: Option<&str>,
        aspect: Option<&str>,
        verify_token: &str,
        callback_url: &str,
    ) -> Result<Value> {
        if verify_token.is_empty() {
            return Err(Error::MissingParameter("verify_token"));
        }
        if callback_url.is_empty() {
            return Err(Error::MissingParameter("callback_url"));
        }
        let params = self
            .client_params()
            .param("object", object.unwrap_or(DEFAULT_SUBSCRIPTION_OBJECT))
            .param("aspect", aspect.unwrap_or(DEFAULT_SUBSCRIPTION_ASPECT))
            .param("verify_token", verify_token)
            .param("callback_url", callback_url);
        self.call("subscriptions", Some(&params), Verb::Post).await
    }

    pub async fn get_subscriptions_list(&self) -> Result<Value> {
        let params = self.client_params();
        self.get("subscriptions", Some(&params)).await
    }

    /// Delete subscriptions by object type. `object` defaults to `all`.
    pub async fn delete_subscriptions_by_object(&self, object: Option<&str>) -> Result<Value> {
        let params = Params::new()
            .param("object", object.unwrap_or(ALL_SUBSCRIPTIONS))
            .merge(self.client_params());
        self.call("subscriptions", Some(&params), Verb::Delete)
            .await
    }

    pub async fn delete_subscription_by_id<I: Display>(&self, id: I) -> Result<Value> {
        let params = Params::new().param("id", id).merge(self.client_params());
        self.call("subscriptions", Some(&params), Verb::Delete)
            .await
    }

    fn client_params(&self) -> Params<'static> {
        let (api_key, api_secret) = self.secrets().get_client_pair();
        Params::new()
            .param("client_id", api_key)
            .param("client_secret", api_secret)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::{Config, PreparedRequest, TransportResult};

    #[derive(Clone, Default)]
    struct Recorder {
        sent: Arc<Mutex<Vec<PreparedRequest>>>,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn send(&self, request: PreparedRequest) -> TransportResult<String> {
            self.sent.lock().unwrap().push(request);
            Ok(r#"{"meta":{"code":200}}"#.to_string())
        }
    }

    impl Recorder {
        /// `(verb, path, query, body)` of the last request.
        fn last(&self) -> (Verb, String, String, Option<String>) {
            let sent = self.sent.lock().unwrap();
            let req = sent.last().unwrap();
            (
                req.verb(),
                req.url().path().to_string(),
                req.url().query().unwrap_or_default().to_string(),
                req.body().map(str::to_string),
            )
        }

        fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    fn instagram(recorder: &Recorder) -> Instagram<Recorder> {
        let mut instagram = Instagram::new_with_client(
            Config::new("key", "secret", "https://example.com/cb"),
            recorder.clone(),
        )
        .unwrap();
        instagram.set_access_token("T");
        instagram
    }

    #[tokio::test]
    async fn user_endpoints() {
        let recorder = Recorder::default();
        let ig = instagram(&recorder);

        ig.search_user("snoop", Some(5)).await.unwrap();
        assert_eq!(
            recorder.last(),
            (
                Verb::Get,
                "/v1/users/search".to_string(),
                "access_token=T&q=snoop&count=5".to_string(),
                None
            )
        );

        ig.get_user("self").await.unwrap();
        assert_eq!(recorder.last().1, "/v1/users/self");

        ig.get_user_media(1574083, None, Some("100"), None)
            .await
            .unwrap();
        let (_, path, query, _) = recorder.last();
        assert_eq!(path, "/v1/users/1574083/media/recent");
        assert_eq!(query, "access_token=T&max_id=100");

        ig.get_user_likes(Some(10), None).await.unwrap();
        assert_eq!(recorder.last().2, "access_token=T&count=10");

        ig.get_user_follows(None).await.unwrap();
        assert_eq!(recorder.last().1, "/v1/users/self/follows");
        assert_eq!(recorder.last().2, "access_token=T");

        ig.get_user_followers(Some(0)).await.unwrap();
        assert_eq!(recorder.last().1, "/v1/users/self/followed-by");
        assert_eq!(recorder.last().2, "access_token=T&count=0");

        ig.get_user_follower_requests(None).await.unwrap();
        assert_eq!(recorder.last().1, "/v1/users/self/requested-by");

        ig.get_user_relationship(42).await.unwrap();
        assert_eq!(recorder.last().1, "/v1/users/42/relationship");
    }

    #[tokio::test]
    async fn modify_relationship_posts_action() {
        let recorder = Recorder::default();
        let ig = instagram(&recorder);

        ig.modify_relationship("follow", 42).await.unwrap();
        assert_eq!(
            recorder.last(),
            (
                Verb::Post,
                "/v1/users/42/relationship".to_string(),
                "access_token=T".to_string(),
                Some("action=follow".to_string())
            )
        );
    }

    #[tokio::test]
    async fn modify_relationship_rejects_bad_input() {
        let recorder = Recorder::default();
        let ig = instagram(&recorder);

        assert!(matches!(
            ig.modify_relationship("nonsense", 42).await,
            Err(Error::InvalidAction(_))
        ));
        assert!(matches!(
            ig.modify_relationship("block", "").await,
            Err(Error::InvalidAction(_))
        ));
        assert_eq!(recorder.count(), 0);
    }

    #[tokio::test]
    async fn media_endpoints() {
        let recorder = Recorder::default();
        let ig = instagram(&recorder);

        ig.search_media(48.858, 2.294, None, Some(1357020000), None)
            .await
            .unwrap();
        assert_eq!(
            recorder.last().2,
            "access_token=T&lat=48.858&lng=2.294&distance=1000&min_timestamp=1357020000"
        );

        ig.get_media("3").await.unwrap();
        assert_eq!(recorder.last().1, "/v1/media/3");

        ig.get_media_by_shortcode("D").await.unwrap();
        assert_eq!(recorder.last().1, "/v1/media/shortcode/D");

        ig.like_media(3).await.unwrap();
        assert_eq!(recorder.last().0, Verb::Post);
        assert_eq!(recorder.last().1, "/v1/media/3/likes");
        assert_eq!(recorder.last().3, None);

        ig.delete_liked_media(3).await.unwrap();
        assert_eq!(recorder.last().0, Verb::Delete);
        assert_eq!(recorder.last().1, "/v1/media/3/likes");

        ig.get_media_likes(3).await.unwrap();
        assert_eq!(recorder.last().0, Verb::Get);

        ig.get_media_comments(3).await.unwrap();
        assert_eq!(recorder.last().1, "/v1/media/3/comments");

        ig.delete_media_comment(3, 7).await.unwrap();
        assert_eq!(recorder.last().0, Verb::Delete);
        assert_eq!(recorder.last().1, "/v1/media/3/comments/7");
    }

    #[tokio::test]
    async fn tag_and_location_endpoints() {
        let recorder = Recorder::default();
        let ig = instagram(&recorder);

        ig.search_tags("snow").await.unwrap();
        assert_eq!(recorder.last().2, "access_token=T&q=snow");

        ig.get_tag("snow").await.unwrap();
        assert_eq!(recorder.last().1, "/v1/tags/snow");

        ig.get_tag_media("snow", Some(3), None, Some("9"))
            .await
            .unwrap();
        assert_eq!(recorder.last().1, "/v1/tags/snow/media/recent");
        assert_eq!(recorder.last().2, "access_token=T&count=3&min_tag_id=9");

        ig.get_location(1).await.unwrap();
        assert_eq!(recorder.last().1, "/v1/locations/1");

        ig.get_location_media(1, None, None).await.unwrap();
        assert_eq!(recorder.last().1, "/v1/locations/1/media/recent");
        assert_eq!(recorder.last().2, "access_token=T");

        ig.search_location(48.858, 2.294, Some(5000)).await.unwrap();
        assert_eq!(
            recorder.last().2,
            "access_token=T&lat=48.858&lng=2.294&distance=5000"
        );
    }

    #[tokio::test]
    async fn subscription_endpoints() {
        let recorder = Recorder::default();
        let ig = instagram(&recorder);

        ig.create_subscription(None, None, "vt", "https://example.com/rt")
            .await
            .unwrap();
        assert_eq!(
            recorder.last(),
            (
                Verb::Post,
                "/v1/subscriptions".to_string(),
                "access_token=T".to_string(),
                Some(
                    "client_id=key&client_secret=secret&object=user&aspect=media\
                     &verify_token=vt&callback_url=https%3A%2F%2Fexample.com%2Frt"
                        .to_string()
                )
            )
        );

        ig.get_subscriptions_list().await.unwrap();
        assert_eq!(
            recorder.last().2,
            "access_token=T&client_id=key&client_secret=secret"
        );

        ig.delete_subscriptions_by_object(None).await.unwrap();
        assert_eq!(recorder.last().0, Verb::Delete);
        assert_eq!(
            recorder.last().2,
            "access_token=T&object=all&client_id=key&client_secret=secret"
        );
        assert_eq!(recorder.last().3, None);

        ig.delete_subscription_by_id(12).await.unwrap();
        assert_eq!(
            recorder.last().2,
            "access_token=T&id=12&client_id=key&client_secret=secret"
        );
    }

    #[tokio::test]
    async fn create_subscription_requires_token_and_callback() {
        let recorder = Recorder::default();
        let ig = instagram(&recorder);

        assert!(matches!(
            ig.create_subscription(None, None, "", "https://example.com/rt")
                .await,
            Err(Error::MissingParameter("verify_token"))
        ));
        assert!(matches!(
            ig.create_subscription(Some("tag"), None, "vt", "").await,
            Err(Error::MissingParameter("callback_url"))
        ));
        assert_eq!(recorder.count(), 0);
    }

    #[tokio::test]
    async fn reserved_characters_stay_in_their_segment() {
        let recorder = Recorder::default();
        let ig = instagram(&recorder);

        ig.get_tag("#snow").await.unwrap();
        let (_, path, query, _) = recorder.last();
        assert_eq!(path, "/v1/tags/%23snow");
        assert_eq!(query, "access_token=T");

        ig.get_tag_media("a?b", Some(3), None, None).await.unwrap();
        let (_, path, query, _) = recorder.last();
        assert_eq!(path, "/v1/tags/a%3Fb/media/recent");
        assert_eq!(query, "access_token=T&count=3");

        ig.get_user("../oauth/access_token").await.unwrap();
        assert_eq!(recorder.last().1, "/v1/users/..%2Foauth%2Faccess_token");

        ig.get_media_by_shortcode("B/x y").await.unwrap();
        assert_eq!(recorder.last().1, "/v1/media/shortcode/B%2Fx%20y");

        ig.delete_media_comment(3, "7#frag").await.unwrap();
        assert_eq!(recorder.last().1, "/v1/media/3/comments/7%23frag");
        assert_eq!(recorder.count(), 5);
    }

    #[tokio::test]
    async fn dot_segments_are_rejected() {
        let recorder = Recorder::default();
        let ig = instagram(&recorder);

        assert!(matches!(ig.get_user("..").await, Err(Error::InvalidPath(_))));
        assert!(matches!(ig.get_tag("").await, Err(Error::InvalidPath(_))));
        assert!(matches!(
            ig.get_location_media(".", None, None).await,
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            ig.modify_relationship("follow", "..").await,
            Err(Error::InvalidPath(_))
        ));
        assert_eq!(recorder.count(), 0);
    }
}
